use crate::period::RegimePeriod;
use analytics::{AnalyticsEngine, PerformanceMetrics};
use core_types::Execution;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bucket for executions that fall outside every known period.
pub const UNKNOWN_REGIME: &str = "Unknown";

const HOURS_PER_DAY: u32 = 24;

/// Execution-level metrics of one regime, plus how often and how long it occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimePerformance {
    pub regime: String,
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
    /// Number of historical periods carrying this regime name.
    pub occurrences: usize,
    pub average_duration_days: i64,
    pub execution_count: usize,
}

/// Groups executions by the regime that was active when they happened.
///
/// Only the first matching period is used. Executions no period claims go
/// to the `"Unknown"` bucket; with no periods at all, every execution does.
pub fn assign_executions(
    executions: &[Execution],
    periods: &[RegimePeriod],
) -> BTreeMap<String, Vec<Execution>> {
    let mut buckets: BTreeMap<String, Vec<Execution>> = BTreeMap::new();

    for execution in executions {
        let regime = periods
            .iter()
            .find(|period| period.contains(execution.timestamp))
            .map_or(UNKNOWN_REGIME, |period| period.regime_name.as_str());

        buckets
            .entry(regime.to_string())
            .or_default()
            .push(execution.clone());
    }

    buckets
}

/// Summarizes performance per regime.
///
/// Every name in `known_types` is reported exactly once, with zeroed
/// metrics when no execution fell into it, so quiet regimes stay visible.
/// The result is ordered by execution count, highest first; regimes with
/// equal counts keep alphabetical order.
#[tracing::instrument(
    name = "regime_performance",
    skip_all,
    fields(executions = executions.len(), periods = periods.len())
)]
pub fn regime_performance(
    executions: &[Execution],
    periods: &[RegimePeriod],
    known_types: &[String],
) -> Vec<RegimePerformance> {
    let mut buckets = assign_executions(executions, periods);
    for known in known_types {
        buckets.entry(known.clone()).or_default();
    }

    let engine = AnalyticsEngine::new();
    let mut performance: Vec<RegimePerformance> = buckets
        .into_iter()
        .map(|(regime, assigned)| {
            let matching: Vec<&RegimePeriod> =
                periods.iter().filter(|p| p.regime_name == regime).collect();

            RegimePerformance {
                metrics: engine.compute_metrics(&assigned),
                occurrences: matching.len(),
                average_duration_days: average_duration_days(&matching),
                execution_count: assigned.len(),
                regime,
            }
        })
        .collect();

    performance.sort_by(|a, b| b.execution_count.cmp(&a.execution_count));

    tracing::debug!(regimes = performance.len(), "Aggregated performance per regime.");
    performance
}

/// Mean duration of the periods that have one, in whole days.
fn average_duration_days(periods: &[&RegimePeriod]) -> i64 {
    let durations: Vec<Decimal> = periods.iter().filter_map(|p| p.duration_hours).collect();
    if durations.is_empty() {
        return 0;
    }

    let mean_hours = durations.iter().sum::<Decimal>() / Decimal::from(durations.len());
    (mean_hours / Decimal::from(HOURS_PER_DAY))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
