//! Append-only quality-metric log. The store is a collaborator seam; the in-memory
//! implementation backs the service and the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::judge::evaluator::{CriterionScore, JudgeResult, Recommendation};
use crate::suggestions::types::{Section, Suggestion};

/// One judged suggestion, as recorded for quality monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetricLog {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub section: Section,
    pub suggestion_id: Uuid,
    pub overall: u8,
    pub recommendation: Recommendation,
    pub criteria: Vec<CriterionScore>,
    pub reasoning: String,
}

impl QualityMetricLog {
    pub fn from_judged(suggestion: &Suggestion, result: &JudgeResult, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: at,
            section: suggestion.section,
            suggestion_id: suggestion.id,
            overall: result.overall,
            recommendation: result.recommendation,
            criteria: result.criteria.clone(),
            reasoning: result.reasoning.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("quality log unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait QualityLogStore: Send + Sync {
    async fn append(&self, entries: Vec<QualityMetricLog>) -> Result<(), AggregationError>;

    /// Entries recorded at or after `since`, oldest first.
    async fn since(&self, since: DateTime<Utc>) -> Result<Vec<QualityMetricLog>, AggregationError>;
}

#[derive(Debug, Default)]
pub struct InMemoryQualityLog {
    entries: RwLock<Vec<QualityMetricLog>>,
}

impl InMemoryQualityLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QualityLogStore for InMemoryQualityLog {
    async fn append(&self, entries: Vec<QualityMetricLog>) -> Result<(), AggregationError> {
        let mut log = self.entries.write().await;
        log.extend(entries);
        log.sort_by_key(|e| e.recorded_at);
        Ok(())
    }

    async fn since(&self, since: DateTime<Utc>) -> Result<Vec<QualityMetricLog>, AggregationError> {
        let log = self.entries.read().await;
        Ok(log
            .iter()
            .filter(|e| e.recorded_at >= since)
            .cloned()
            .collect())
    }
}


#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::testing::entry;
    use super::*;

    #[tokio::test]
    async fn test_since_filters_and_orders() {
        let store = InMemoryQualityLog::new();
        let now = Utc::now();
        store
            .append(vec![
                entry(80, "recent", now),
                entry(60, "old", now - Duration::days(10)),
                entry(70, "middle", now - Duration::days(2)),
            ])
            .await
            .unwrap();

        let week = store.since(now - Duration::days(7)).await.unwrap();
        let reasons: Vec<_> = week.iter().map(|e| e.reasoning.as_str()).collect();
        assert_eq!(reasons, vec!["middle", "recent"]);
    }

    #[tokio::test]
    async fn test_empty_store_reads_empty() {
        let store = InMemoryQualityLog::new();
        assert!(store.since(Utc::now()).await.unwrap().is_empty());
    }
}
