//! Suggestion Orchestrator: fans out every applicable section generator concurrently and
//! settles all of them: one section failing never discards another section's result.
//!
//! Each generator call is raced against `LLM_CALL_TIMEOUT`. A timed-out generator future is
//! dropped, which cancels its in-flight model request. Dropping the `JoinSet` aborts any
//! tasks still running, so abandoning the whole fan-out cancels it too.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::errors::ErrorDetail;
use crate::llm_client::{LlmError, LLM_CALL_TIMEOUT};
use crate::suggestions::context::GenerationContext;
use crate::suggestions::generator::SectionGenerator;
use crate::suggestions::types::{GenerationError, Section, Suggestion};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Success { suggestions: Vec<Suggestion> },
    Failure { error: ErrorDetail },
}

impl SectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SectionOutcome::Success { .. })
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            SectionOutcome::Success { suggestions } => suggestions,
            SectionOutcome::Failure { .. } => &[],
        }
    }
}

impl From<Result<Vec<Suggestion>, GenerationError>> for SectionOutcome {
    fn from(result: Result<Vec<Suggestion>, GenerationError>) -> Self {
        match result {
            Ok(suggestions) => SectionOutcome::Success { suggestions },
            Err(e) => SectionOutcome::Failure { error: e.detail() },
        }
    }
}

/// Runs `generators` concurrently under the default guard.
pub async fn run_generators(
    generators: Vec<Arc<dyn SectionGenerator>>,
    ctx: Arc<GenerationContext>,
) -> BTreeMap<Section, SectionOutcome> {
    run_generators_with_limit(generators, ctx, LLM_CALL_TIMEOUT).await
}

pub async fn run_generators_with_limit(
    generators: Vec<Arc<dyn SectionGenerator>>,
    ctx: Arc<GenerationContext>,
    limit: Duration,
) -> BTreeMap<Section, SectionOutcome> {
    let expected: Vec<Section> = generators.iter().map(|g| g.section()).collect();
    let mut set = JoinSet::new();

    for generator in generators {
        let ctx = Arc::clone(&ctx);
        set.spawn(async move {
            let section = generator.section();
            let result = match tokio::time::timeout(limit, generator.generate(&ctx)).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::from_llm(
                    section,
                    LlmError::Timeout {
                        secs: limit.as_secs(),
                    },
                )),
            };
            (section, result)
        });
    }

    let mut outcomes = BTreeMap::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((section, result)) => {
                match &result {
                    Ok(s) => info!("{section} generation succeeded with {} suggestions", s.len()),
                    Err(e) => warn!("{section} generation failed: {e}"),
                }
                outcomes.insert(section, SectionOutcome::from(result));
            }
            // Section identity is recovered below from `expected`.
            Err(e) => warn!("generation task did not complete: {e}"),
        }
    }

    for section in expected {
        outcomes.entry(section).or_insert_with(|| {
            SectionOutcome::from(Err(GenerationError::Aborted {
                section,
                message: "task panicked or was cancelled".to_string(),
            }))
        });
    }

    outcomes
}
