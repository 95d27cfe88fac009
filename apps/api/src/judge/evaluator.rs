//! Judge: scores one suggestion per criterion and derives the recommendation.
//!
//! The model supplies only per-criterion scores and reasoning. The overall score is a fixed
//! weighted sum and the recommendation is a pure function of that score.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ErrorDetail;
use crate::judge::context::SuggestionContext;
use crate::judge::prompts::{judge_prompt, judge_system};
use crate::llm_client::{call_json, LanguageModel, LlmError};

/// Overall score at or above which a suggestion passes.
pub const DEFAULT_QUALITY_THRESHOLD: u8 = 70;
/// Overall score below which a suggestion fails.
pub const BORDERLINE_THRESHOLD_LOW: u8 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Accuracy,
    Relevance,
    Honesty,
    Specificity,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Accuracy,
        Criterion::Relevance,
        Criterion::Honesty,
        Criterion::Specificity,
    ];

    /// Contribution to the overall score. Sums to 1.0 across all criteria.
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::Accuracy => 0.25,
            Criterion::Relevance => 0.25,
            Criterion::Honesty => 0.30,
            Criterion::Specificity => 0.20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Pass,
    Borderline,
    Fail,
}

pub fn recommend(overall: u8) -> Recommendation {
    if overall >= DEFAULT_QUALITY_THRESHOLD {
        Recommendation::Pass
    } else if overall < BORDERLINE_THRESHOLD_LOW {
        Recommendation::Fail
    } else {
        Recommendation::Borderline
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub score: u8,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeResult {
    pub suggestion_id: Uuid,
    pub criteria: Vec<CriterionScore>,
    pub overall: u8,
    pub recommendation: Recommendation,
    pub reasoning: String,
}

impl JudgeResult {
    /// Builds a result from per-criterion scores; any criterion not supplied scores 0.
    pub fn from_scores(suggestion_id: Uuid, criteria: Vec<CriterionScore>, reasoning: String) -> Self {
        let overall = Criterion::ALL
            .iter()
            .map(|c| {
                let score = criteria
                    .iter()
                    .find(|s| s.criterion == *c)
                    .map_or(0.0, |s| s.score as f64);
                score * c.weight()
            })
            .sum::<f64>()
            .round()
            .clamp(0.0, 100.0) as u8;

        Self {
            suggestion_id,
            criteria,
            overall,
            recommendation: recommend(overall),
            reasoning,
        }
    }

    pub fn score_for(&self, criterion: Criterion) -> Option<u8> {
        self.criteria
            .iter()
            .find(|s| s.criterion == criterion)
            .map(|s| s.score)
    }
}

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("judge timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("judge returned an unexpected shape: {0}")]
    Schema(String),

    #[error("judge call failed: {0}")]
    Llm(String),

    #[error("judge task aborted: {0}")]
    Aborted(String),
}

impl From<LlmError> for JudgeError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout { secs } => JudgeError::Timeout { secs },
            e if e.is_schema_mismatch() => JudgeError::Schema(e.to_string()),
            e => JudgeError::Llm(e.to_string()),
        }
    }
}

impl JudgeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, JudgeError::Timeout { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            JudgeError::Timeout { .. } => "JUDGE_TIMEOUT",
            JudgeError::Schema(_) => "JUDGE_SCHEMA_MISMATCH",
            JudgeError::Llm(_) => "JUDGE_FAILED",
            JudgeError::Aborted(_) => "JUDGE_ABORTED",
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoredReason {
    score: f64,
    #[serde(default)]
    reasoning: String,
}

#[derive(Debug, Deserialize)]
struct JudgeReply {
    accuracy: ScoredReason,
    relevance: ScoredReason,
    honesty: ScoredReason,
    specificity: ScoredReason,
    #[serde(default)]
    reasoning: String,
}

impl JudgeReply {
    fn into_result(self, suggestion_id: Uuid) -> Result<JudgeResult, JudgeError> {
        let pairs = [
            (Criterion::Accuracy, self.accuracy),
            (Criterion::Relevance, self.relevance),
            (Criterion::Honesty, self.honesty),
            (Criterion::Specificity, self.specificity),
        ];

        let mut criteria = Vec::with_capacity(pairs.len());
        for (criterion, scored) in pairs {
            if !(0.0..=100.0).contains(&scored.score) {
                return Err(JudgeError::Schema(format!(
                    "{criterion:?} score {} outside 0-100",
                    scored.score
                )));
            }
            criteria.push(CriterionScore {
                criterion,
                score: scored.score.round() as u8,
                reasoning: scored.reasoning,
            });
        }

        Ok(JudgeResult::from_scores(suggestion_id, criteria, self.reasoning))
    }
}

/// Judges one suggestion. Errors are reported, never escalated; the caller owns the policy.
pub async fn judge_suggestion(
    llm: &dyn LanguageModel,
    ctx: &SuggestionContext,
) -> Result<JudgeResult, JudgeError> {
    let reply: JudgeReply = call_json(llm, &judge_prompt(ctx), &judge_system()).await?;
    let result = reply.into_result(ctx.suggestion_id)?;
    debug!(
        "Judged {} suggestion: overall {} ({:?})",
        ctx.section, result.overall, result.recommendation
    );
    Ok(result)
}

#[cfg(test)]
pub mod testing {
    use serde_json::{json, Value};

    /// Judge reply with every criterion at `score`.
    pub fn uniform_reply(score: u8, reasoning: &str) -> Value {
        let c = json!({"score": score, "reasoning": reasoning});
        json!({
            "accuracy": c,
            "relevance": c,
            "honesty": c,
            "specificity": c,
            "reasoning": reasoning
        })
    }
}

#[cfg(test)]
mod tests {
    use super::testing::uniform_reply;
    use super::*;
    use crate::judge::prompts::JUDGE_TASK_MARKER;
    use crate::llm_client::testing::{Reply, ScriptedLlm};
    use crate::suggestions::types::Section;
    use serde_json::json;

    fn ctx() -> SuggestionContext {
        SuggestionContext {
            suggestion_id: Uuid::nil(),
            section: Section::Experience,
            original_text: "Worked on internal tooling".to_string(),
            suggested_text: "Built internal Python tooling".to_string(),
            jd_excerpt: "We need Python engineers.".to_string(),
            matched_keywords: vec!["Python".to_string()],
            addressable_keywords: vec![],
            unsupported_keywords: vec!["Kubernetes".to_string()],
            ats_score: 60,
        }
    }

    #[test]
    fn test_criterion_weights_sum_to_one() {
        let total: f64 = Criterion::ALL.iter().map(Criterion::weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendation_boundaries() {
        assert_eq!(recommend(DEFAULT_QUALITY_THRESHOLD), Recommendation::Pass);
        assert_eq!(recommend(DEFAULT_QUALITY_THRESHOLD - 1), Recommendation::Borderline);
        assert_eq!(recommend(BORDERLINE_THRESHOLD_LOW), Recommendation::Borderline);
        assert_eq!(recommend(BORDERLINE_THRESHOLD_LOW - 1), Recommendation::Fail);
        assert_eq!(recommend(100), Recommendation::Pass);
        assert_eq!(recommend(0), Recommendation::Fail);
    }

    #[test]
    fn test_recommendation_is_pure_function_of_score() {
        for score in 0..=100u8 {
            let expected = if score >= DEFAULT_QUALITY_THRESHOLD {
                Recommendation::Pass
            } else if score < BORDERLINE_THRESHOLD_LOW {
                Recommendation::Fail
            } else {
                Recommendation::Borderline
            };
            assert_eq!(recommend(score), expected);
        }
    }

    #[tokio::test]
    async fn test_score_exactly_at_threshold_passes() {
        let llm = ScriptedLlm::new().json(
            JUDGE_TASK_MARKER,
            uniform_reply(DEFAULT_QUALITY_THRESHOLD, "solid"),
        );
        let result = judge_suggestion(&llm, &ctx()).await.unwrap();
        assert_eq!(result.overall, DEFAULT_QUALITY_THRESHOLD);
        assert_eq!(result.recommendation, Recommendation::Pass);
        assert_eq!(result.criteria.len(), 4);
    }

    #[tokio::test]
    async fn test_weighted_overall() {
        let llm = ScriptedLlm::new().json(
            JUDGE_TASK_MARKER,
            json!({
                "accuracy": {"score": 80, "reasoning": ""},
                "relevance": {"score": 80, "reasoning": ""},
                "honesty": {"score": 20, "reasoning": "claims Kubernetes"},
                "specificity": {"score": 80, "reasoning": ""},
                "reasoning": "fabricates"
            }),
        );
        let result = judge_suggestion(&llm, &ctx()).await.unwrap();
        // 0.25*80 + 0.25*80 + 0.30*20 + 0.20*80 = 62
        assert_eq!(result.overall, 62);
        assert_eq!(result.recommendation, Recommendation::Borderline);
        assert_eq!(result.score_for(Criterion::Honesty), Some(20));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_schema_error() {
        let llm = ScriptedLlm::new().json(JUDGE_TASK_MARKER, uniform_reply(70, "ok"));
        let mut bad = uniform_reply(70, "ok");
        bad["honesty"]["score"] = json!(140);
        let llm_bad = ScriptedLlm::new().json(JUDGE_TASK_MARKER, bad);

        assert!(judge_suggestion(&llm, &ctx()).await.is_ok());
        let err = judge_suggestion(&llm_bad, &ctx()).await.unwrap_err();
        assert_eq!(err.code(), "JUDGE_SCHEMA_MISMATCH");
    }

    #[tokio::test(start_paused = true)]
    async fn test_judge_timeout_is_distinct() {
        let llm = ScriptedLlm::new().route(JUDGE_TASK_MARKER, Reply::Hang);
        let err = judge_suggestion(&llm, &ctx()).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.code(), "JUDGE_TIMEOUT");
    }

    #[test]
    fn test_prompt_lists_unsupported_keywords() {
        let prompt = judge_prompt(&ctx());
        assert!(prompt.starts_with(JUDGE_TASK_MARKER));
        assert!(prompt.contains("UNSUPPORTED KEYWORDS (no resume evidence): Kubernetes"));
    }
}
