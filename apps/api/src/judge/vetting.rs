//! Runs the judge over every generated suggestion concurrently and applies the verdicts.
//!
//! - pass: shown, status stays pending until the user decides
//! - borderline: shown with `low_confidence`, never silently upgraded
//! - fail: withheld and rejected
//! - judge error: decided by `UnjudgedPolicy`; shown ones carry `unvetted`

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::errors::ErrorDetail;
use crate::judge::context::SuggestionContext;
use crate::judge::evaluator::{judge_suggestion, JudgeError, JudgeResult, Recommendation};
use crate::llm_client::LanguageModel;
use crate::suggestions::types::{Suggestion, SuggestionStatus};

/// What to do with a suggestion the judge could not score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnjudgedPolicy {
    #[default]
    Withhold,
    ShowUnvetted,
}

impl FromStr for UnjudgedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "withhold" => Ok(UnjudgedPolicy::Withhold),
            "show_unvetted" => Ok(UnjudgedPolicy::ShowUnvetted),
            other => Err(format!(
                "unknown unjudged policy '{other}' (expected 'withhold' or 'show_unvetted')"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Judged { result: JudgeResult },
    Unjudged { error: ErrorDetail },
    /// Judging is switched off.
    NotRequested,
}

#[derive(Debug, Clone, Serialize)]
pub struct VettedSuggestion {
    pub suggestion: Suggestion,
    pub verdict: Verdict,
}

impl VettedSuggestion {
    pub fn judge_result(&self) -> Option<&JudgeResult> {
        match &self.verdict {
            Verdict::Judged { result } => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VettingReport {
    pub approved: Vec<VettedSuggestion>,
    pub withheld: Vec<VettedSuggestion>,
}

impl VettingReport {
    pub fn judged(&self) -> impl Iterator<Item = (&Suggestion, &JudgeResult)> {
        self.approved
            .iter()
            .chain(self.withheld.iter())
            .filter_map(|v| v.judge_result().map(|r| (&v.suggestion, r)))
    }
}

/// Applies one verdict. Returns the vetted suggestion and whether it is shown.
/// The judge never accepts: status only moves to `Rejected` on a fail.
pub fn apply_verdict(
    mut suggestion: Suggestion,
    outcome: Result<JudgeResult, JudgeError>,
    policy: UnjudgedPolicy,
) -> (VettedSuggestion, bool) {
    let (verdict, shown) = match outcome {
        Ok(result) => {
            let shown = match result.recommendation {
                Recommendation::Pass => true,
                Recommendation::Borderline => {
                    suggestion.low_confidence = true;
                    true
                }
                Recommendation::Fail => {
                    suggestion.status = SuggestionStatus::Rejected;
                    false
                }
            };
            (Verdict::Judged { result }, shown)
        }
        Err(e) => {
            warn!("Suggestion {} left unjudged: {e}", suggestion.id);
            let shown = match policy {
                UnjudgedPolicy::Withhold => false,
                UnjudgedPolicy::ShowUnvetted => {
                    suggestion.unvetted = true;
                    true
                }
            };
            (Verdict::Unjudged { error: e.detail() }, shown)
        }
    };

    (VettedSuggestion { suggestion, verdict }, shown)
}

/// Passes everything through unvetted; used when judging is disabled.
pub fn skip_vetting(suggestions: Vec<Suggestion>) -> VettingReport {
    VettingReport {
        approved: suggestions
            .into_iter()
            .map(|mut suggestion| {
                suggestion.unvetted = true;
                VettedSuggestion {
                    suggestion,
                    verdict: Verdict::NotRequested,
                }
            })
            .collect(),
        withheld: vec![],
    }
}

/// Judges all suggestions concurrently. Output keeps input order within each bucket.
pub async fn vet_suggestions(
    llm: Arc<dyn LanguageModel>,
    items: Vec<(Suggestion, SuggestionContext)>,
    policy: UnjudgedPolicy,
) -> VettingReport {
    let mut set = JoinSet::new();
    for (index, (_, ctx)) in items.iter().enumerate() {
        let llm = Arc::clone(&llm);
        let ctx = ctx.clone();
        set.spawn(async move { (index, judge_suggestion(llm.as_ref(), &ctx).await) });
    }

    let mut outcomes: Vec<Option<Result<JudgeResult, JudgeError>>> =
        (0..items.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(e) => warn!("judge task did not complete: {e}"),
        }
    }

    let mut report = VettingReport::default();
    for ((suggestion, _), outcome) in items.into_iter().zip(outcomes) {
        let outcome = outcome
            .unwrap_or_else(|| Err(JudgeError::Aborted("task panicked or was cancelled".to_string())));
        let (vetted, shown) = apply_verdict(suggestion, outcome, policy);
        if shown {
            report.approved.push(vetted);
        } else {
            report.withheld.push(vetted);
        }
    }

    info!(
        "Vetting complete: {} approved, {} withheld",
        report.approved.len(),
        report.withheld.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::evaluator::testing::uniform_reply;
    use crate::judge::prompts::JUDGE_TASK_MARKER;
    use crate::llm_client::testing::{Reply, ScriptedLlm};
    use crate::suggestions::types::Section;

    fn suggestion(text: &str) -> Suggestion {
        Suggestion::draft(
            Section::Experience,
            None,
            "Worked on tooling".to_string(),
            text.to_string(),
            vec![],
            String::new(),
        )
    }

    fn ctx_for(s: &Suggestion) -> SuggestionContext {
        SuggestionContext {
            suggestion_id: s.id,
            section: s.section,
            original_text: s.original_text.clone(),
            suggested_text: s.suggested_text.clone(),
            jd_excerpt: "Python role.".to_string(),
            matched_keywords: vec![],
            addressable_keywords: vec![],
            unsupported_keywords: vec![],
            ats_score: 50,
        }
    }

    fn items(texts: &[&str]) -> Vec<(Suggestion, SuggestionContext)> {
        texts
            .iter()
            .map(|t| {
                let s = suggestion(t);
                let c = ctx_for(&s);
                (s, c)
            })
            .collect()
    }

    #[test]
    fn test_policy_parses() {
        assert_eq!("withhold".parse::<UnjudgedPolicy>(), Ok(UnjudgedPolicy::Withhold));
        assert_eq!(
            "SHOW_UNVETTED".parse::<UnjudgedPolicy>(),
            Ok(UnjudgedPolicy::ShowUnvetted)
        );
        assert!("maybe".parse::<UnjudgedPolicy>().is_err());
    }

    #[tokio::test]
    async fn test_verdicts_route_to_buckets() {
        // Routes are matched in order against the prompt, which embeds the suggested text.
        let llm = ScriptedLlm::new()
            .json("GOOD", uniform_reply(90, "specific and honest"))
            .json("MEH", uniform_reply(60, "a bit vague"))
            .json("BAD", uniform_reply(20, "fabricated claims"));

        let report = vet_suggestions(
            Arc::new(llm),
            items(&["GOOD rewrite", "MEH rewrite", "BAD rewrite"]),
            UnjudgedPolicy::Withhold,
        )
        .await;

        assert_eq!(report.approved.len(), 2);
        assert_eq!(report.withheld.len(), 1);

        // the judge never accepts on the user's behalf
        let good = &report.approved[0].suggestion;
        assert_eq!(good.status, SuggestionStatus::Pending);
        assert!(!good.low_confidence);

        let meh = &report.approved[1].suggestion;
        assert_eq!(meh.status, SuggestionStatus::Pending);
        assert!(meh.low_confidence, "borderline must be flagged, not upgraded");

        assert_eq!(report.withheld[0].suggestion.status, SuggestionStatus::Rejected);
        assert_eq!(report.judged().count(), 3);
        for (suggestion, result) in report.judged() {
            assert_eq!(result.suggestion_id, suggestion.id);
        }
    }

    #[tokio::test]
    async fn test_judge_error_isolated_and_policy_applied() {
        let llm: Arc<dyn LanguageModel> = Arc::new(
            ScriptedLlm::new()
                .route("BROKEN", Reply::Fail(500))
                .json(JUDGE_TASK_MARKER, uniform_reply(85, "fine")),
        );

        let withheld = vet_suggestions(
            Arc::clone(&llm),
            items(&["BROKEN rewrite", "fine rewrite"]),
            UnjudgedPolicy::Withhold,
        )
        .await;
        assert_eq!(withheld.approved.len(), 1);
        assert_eq!(withheld.withheld.len(), 1);
        assert!(matches!(
            withheld.withheld[0].verdict,
            Verdict::Unjudged { ref error } if error.code == "JUDGE_FAILED"
        ));
        assert_eq!(withheld.withheld[0].suggestion.status, SuggestionStatus::Pending);

        let shown = vet_suggestions(
            llm,
            items(&["BROKEN rewrite", "fine rewrite"]),
            UnjudgedPolicy::ShowUnvetted,
        )
        .await;
        assert_eq!(shown.approved.len(), 2);
        assert!(shown.approved[0].suggestion.unvetted);
        assert_eq!(shown.approved[0].suggestion.status, SuggestionStatus::Pending);
        assert!(!shown.approved[1].suggestion.unvetted);
        assert_eq!(shown.judged().count(), 1);
    }

    #[test]
    fn test_skip_vetting_marks_unvetted() {
        let report = skip_vetting(vec![suggestion("x")]);
        assert!(report.approved[0].suggestion.unvetted);
        assert_eq!(report.approved[0].suggestion.status, SuggestionStatus::Pending);
        assert!(matches!(report.approved[0].verdict, Verdict::NotRequested));
    }
}
