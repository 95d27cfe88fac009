//! Quality Metrics Aggregator: windowed statistics and health over the judge log.
//!
//! Reads never fail: an empty window or an unreadable log both yield `QualityReport::NoData`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::judge::evaluator::{Criterion, Recommendation, DEFAULT_QUALITY_THRESHOLD};
use crate::metrics::patterns::{extract_failure_patterns, FailurePattern};
use crate::metrics::store::{QualityLogStore, QualityMetricLog};
use crate::suggestions::types::Section;

const HEALTHY_PASS_RATE: f64 = 0.8;
const HEALTHY_AVERAGE: f64 = 70.0;
const CRITICAL_PASS_RATE: f64 = 0.6;
const CRITICAL_AVERAGE: f64 = 55.0;

const HISTOGRAM_BUCKETS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// Since midnight UTC.
    Today,
    /// Trailing seven days.
    #[default]
    Weekly,
}

impl TimeWindow {
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeWindow::Today => Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN)),
            TimeWindow::Weekly => now - Duration::days(7),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

pub fn classify_health(pass_rate: f64, average_score: f64) -> HealthStatus {
    if pass_rate < CRITICAL_PASS_RATE || average_score < CRITICAL_AVERAGE {
        HealthStatus::Critical
    } else if pass_rate >= HEALTHY_PASS_RATE && average_score >= HEALTHY_AVERAGE {
        HealthStatus::Healthy
    } else {
        HealthStatus::Warning
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Inclusive lower bound.
    pub from: u8,
    /// Inclusive upper bound.
    pub to: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub window: TimeWindow,
    pub since: DateTime<Utc>,
    pub total: usize,
    pub pass_count: usize,
    pub borderline_count: usize,
    pub fail_count: usize,
    pub pass_rate: f64,
    pub average_score: f64,
    pub histogram: Vec<HistogramBucket>,
    pub criteria_averages: BTreeMap<Criterion, f64>,
    /// Criteria scoring under the pass threshold on non-passing verdicts.
    pub failure_breakdown: BTreeMap<Criterion, usize>,
    pub section_counts: BTreeMap<Section, usize>,
    pub failure_patterns: Vec<FailurePattern>,
    pub health: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QualityReport {
    NoData { window: TimeWindow },
    Data(QualitySummary),
}

fn histogram(entries: &[&QualityMetricLog]) -> Vec<HistogramBucket> {
    let mut buckets: Vec<HistogramBucket> = (0..HISTOGRAM_BUCKETS)
        .map(|i| HistogramBucket {
            from: (i * 10) as u8,
            to: if i + 1 == HISTOGRAM_BUCKETS {
                100
            } else {
                (i * 10 + 9) as u8
            },
            count: 0,
        })
        .collect();
    for e in entries {
        let index = (e.overall as usize / 10).min(HISTOGRAM_BUCKETS - 1);
        buckets[index].count += 1;
    }
    buckets
}

/// Pure aggregation over whatever entries fall inside `window`.
pub fn aggregate(entries: &[QualityMetricLog], window: TimeWindow, now: DateTime<Utc>) -> QualityReport {
    let since = window.start(now);
    let in_window: Vec<&QualityMetricLog> = entries.iter().filter(|e| e.recorded_at >= since).collect();

    if in_window.is_empty() {
        return QualityReport::NoData { window };
    }

    let total = in_window.len();
    let count = |r: Recommendation| in_window.iter().filter(|e| e.recommendation == r).count();
    let pass_count = count(Recommendation::Pass);
    let borderline_count = count(Recommendation::Borderline);
    let fail_count = count(Recommendation::Fail);

    let pass_rate = pass_count as f64 / total as f64;
    let average_score = in_window.iter().map(|e| e.overall as f64).sum::<f64>() / total as f64;

    let mut criteria_averages = BTreeMap::new();
    for criterion in Criterion::ALL {
        let scores: Vec<f64> = in_window
            .iter()
            .filter_map(|e| e.criteria.iter().find(|c| c.criterion == criterion))
            .map(|c| c.score as f64)
            .collect();
        if !scores.is_empty() {
            criteria_averages.insert(criterion, scores.iter().sum::<f64>() / scores.len() as f64);
        }
    }

    let non_passing: Vec<&&QualityMetricLog> = in_window
        .iter()
        .filter(|e| e.recommendation != Recommendation::Pass)
        .collect();

    let mut failure_breakdown = BTreeMap::new();
    for e in &non_passing {
        for c in e.criteria.iter().filter(|c| c.score < DEFAULT_QUALITY_THRESHOLD) {
            *failure_breakdown.entry(c.criterion).or_insert(0) += 1;
        }
    }

    let mut section_counts = BTreeMap::new();
    for e in &in_window {
        *section_counts.entry(e.section).or_insert(0) += 1;
    }

    // One text per entry so phrase counts mean distinct entries.
    let reasonings: Vec<String> = non_passing
        .iter()
        .map(|e| {
            std::iter::once(e.reasoning.as_str())
                .chain(e.criteria.iter().map(|c| c.reasoning.as_str()))
                .collect::<Vec<_>>()
                .join(". ")
        })
        .collect();
    let failure_patterns = extract_failure_patterns(reasonings.iter().map(String::as_str));

    QualityReport::Data(QualitySummary {
        window,
        since,
        total,
        pass_count,
        borderline_count,
        fail_count,
        pass_rate,
        average_score,
        histogram: histogram(&in_window),
        criteria_averages,
        failure_breakdown,
        section_counts,
        failure_patterns,
        health: classify_health(pass_rate, average_score),
    })
}

/// Reads the window from the store and aggregates it. A failed read degrades to `NoData`.
pub async fn load_report(
    store: &dyn QualityLogStore,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> QualityReport {
    match store.since(window.start(now)).await {
        Ok(entries) => aggregate(&entries, window, now),
        Err(e) => {
            warn!("Quality log read failed, reporting no data: {e}");
            QualityReport::NoData { window }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::store::testing::{entry, BrokenLog};
    use crate::metrics::store::InMemoryQualityLog;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 11, 15, 30, 0).unwrap()
    }

    fn summary(report: QualityReport) -> QualitySummary {
        match report {
            QualityReport::Data(s) => s,
            QualityReport::NoData { .. } => panic!("expected data"),
        }
    }

    #[test]
    fn test_empty_log_is_no_data() {
        assert_eq!(
            aggregate(&[], TimeWindow::Weekly, now()),
            QualityReport::NoData {
                window: TimeWindow::Weekly
            }
        );
    }

    #[test]
    fn test_today_window_starts_at_midnight() {
        let start = TimeWindow::Today.start(now());
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap());

        let entries = vec![entry(90, "fine", now() - Duration::hours(20))];
        assert!(matches!(
            aggregate(&entries, TimeWindow::Today, now()),
            QualityReport::NoData { .. }
        ));
        assert!(matches!(
            aggregate(&entries, TimeWindow::Weekly, now()),
            QualityReport::Data(_)
        ));
    }

    #[test]
    fn test_counts_histogram_and_averages() {
        let at = now() - Duration::hours(1);
        let entries = vec![
            entry(90, "crisp", at),
            entry(75, "good", at),
            entry(60, "vague wording", at),
            entry(30, "fabricated metric not supported", at),
        ];
        let s = summary(aggregate(&entries, TimeWindow::Today, now()));

        assert_eq!(s.total, 4);
        assert_eq!((s.pass_count, s.borderline_count, s.fail_count), (2, 1, 1));
        assert!((s.pass_rate - 0.5).abs() < 1e-9);
        assert!((s.average_score - 63.75).abs() < 1e-9);
        assert_eq!(s.histogram.len(), 10);
        assert_eq!(s.histogram[9].count, 1);
        assert_eq!(s.histogram[9].to, 100);
        assert_eq!(s.histogram[3].count, 1);
        assert_eq!(s.histogram.iter().map(|b| b.count).sum::<usize>(), 4);
        assert!((s.criteria_averages[&Criterion::Honesty] - 63.75).abs() < 1e-9);
        assert_eq!(s.failure_breakdown[&Criterion::Honesty], 2);
        assert_eq!(s.section_counts[&Section::Experience], 4);
        assert_eq!(s.health, HealthStatus::Critical);

        let themes: Vec<_> = s.failure_patterns.iter().map(|p| p.pattern.as_str()).collect();
        assert!(themes.contains(&"fabrication"));
        assert!(themes.contains(&"vagueness"));
    }

    #[test]
    fn test_health_thresholds() {
        assert_eq!(classify_health(0.9, 82.0), HealthStatus::Healthy);
        assert_eq!(classify_health(0.8, 70.0), HealthStatus::Healthy);
        assert_eq!(classify_health(0.7, 75.0), HealthStatus::Warning);
        assert_eq!(classify_health(0.9, 60.0), HealthStatus::Warning);
        assert_eq!(classify_health(0.5, 90.0), HealthStatus::Critical);
        assert_eq!(classify_health(0.95, 50.0), HealthStatus::Critical);
    }

    #[tokio::test]
    async fn test_load_report_from_store() {
        let store = InMemoryQualityLog::new();
        store
            .append(vec![entry(88, "ok", now() - Duration::days(1))])
            .await
            .unwrap();
        let s = summary(load_report(&store, TimeWindow::Weekly, now()).await);
        assert_eq!(s.total, 1);
        assert_eq!(s.health, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_unreadable_log_degrades_to_no_data() {
        let report = load_report(&BrokenLog, TimeWindow::Today, now()).await;
        assert_eq!(
            report,
            QualityReport::NoData {
                window: TimeWindow::Today
            }
        );
    }
}
