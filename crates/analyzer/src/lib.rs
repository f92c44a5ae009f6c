//! # Meridian Analyzer
//!
//! Compares finished backtest runs: validates the bundles, scores every run
//! on a common 0-100 scale, ranks them and measures how their equity curves
//! move together.

use analytics::{AdvancedMetrics, AnalyticsEngine, BacktestPerformance};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use uuid::Uuid;

pub mod correlation;
pub mod result;
pub mod validation;

pub use correlation::{correlation, correlation_matrix, CorrelationMatrix};
pub use result::BacktestResult;
pub use validation::{validate, ValidationReport};

/// Score given to every run when a metric does not discriminate between them.
pub const NEUTRAL_SCORE: Decimal = dec!(50);

/// Weights of the composite score. They sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub total_return: Decimal,
    pub sharpe_ratio: Decimal,
    pub max_drawdown: Decimal,
    pub win_rate: Decimal,
}

pub const COMPOSITE_WEIGHTS: ScoringWeights = ScoringWeights {
    total_return: dec!(0.3),
    sharpe_ratio: dec!(0.3),
    max_drawdown: dec!(0.2),
    win_rate: dec!(0.2),
};

/// One run as seen by the ranking: its identity and its performance summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingInput {
    pub run_id: Uuid,
    pub name: String,
    pub performance: BacktestPerformance,
}

impl From<&BacktestResult> for RankingInput {
    fn from(result: &BacktestResult) -> Self {
        Self {
            run_id: result.id,
            name: result.name.clone(),
            performance: result.performance.clone(),
        }
    }
}

/// Per-metric scores of a run, each normalized to 0-100 across the run set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScores {
    pub total_return: Decimal,
    pub sharpe_ratio: Decimal,
    pub max_drawdown: Decimal,
    pub win_rate: Decimal,
}

/// A run's place in the ranking, with the raw values that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub run_id: Uuid,
    pub name: String,
    pub composite_score: Decimal,
    pub scores: MetricScores,
    pub performance: BacktestPerformance,
}

/// The run holding the best value of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricLeader {
    pub run_id: Uuid,
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestInClass {
    pub total_return: Option<MetricLeader>,
    pub sharpe_ratio: Option<MetricLeader>,
    pub max_drawdown: Option<MetricLeader>,
    pub total_trades: Option<MetricLeader>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResult {
    pub best: BestInClass,
    pub rankings: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunValidation {
    pub run_id: Uuid,
    pub name: String,
    pub report: ValidationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRiskProfile {
    pub run_id: Uuid,
    pub name: String,
    pub metrics: AdvancedMetrics,
}

/// Everything the comparison view needs about a set of runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub validations: Vec<RunValidation>,
    pub ranking: RankingResult,
    pub risk_profiles: Vec<RunRiskProfile>,
    pub correlations: CorrelationMatrix,
}

/// The main analysis engine.
#[derive(Debug, Clone)]
pub struct Analyzer {
    weights: ScoringWeights,
    analytics: AnalyticsEngine,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            weights: COMPOSITE_WEIGHTS,
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Validates, ranks and profiles a set of backtest results.
    ///
    /// Every bundle gets a validation report. Only the ones that pass are
    /// trusted for ranking, risk profiles and correlations.
    #[tracing::instrument(name = "compare_runs", skip_all, fields(runs = results.len()))]
    pub fn compare(&self, results: &[BacktestResult]) -> ComparisonReport {
        let mut validations = Vec::with_capacity(results.len());
        let mut trusted = Vec::with_capacity(results.len());

        for result in results {
            let report = validate(result);
            if report.valid {
                trusted.push(result);
            } else {
                tracing::warn!(
                    run = %result.name,
                    errors = report.errors.len(),
                    "Backtest result failed validation and is excluded from the comparison."
                );
            }
            validations.push(RunValidation {
                run_id: result.id,
                name: result.name.clone(),
                report,
            });
        }

        let inputs: Vec<RankingInput> = trusted.iter().map(|r| RankingInput::from(*r)).collect();
        let ranking = self.rank(&inputs);

        let risk_profiles = trusted
            .iter()
            .map(|r| RunRiskProfile {
                run_id: r.id,
                name: r.name.clone(),
                metrics: self
                    .analytics
                    .advanced_metrics(&r.equity_curve, &r.trades, &r.performance),
            })
            .collect();

        let curves: Vec<(&str, &[core_types::EquityPoint])> = trusted
            .iter()
            .map(|r| (r.name.as_str(), r.equity_curve.as_slice()))
            .collect();

        ComparisonReport {
            validations,
            ranking,
            risk_profiles,
            correlations: correlation_matrix(&curves),
        }
    }

    /// Scores and ranks runs against each other.
    ///
    /// Scoring is a batch step: the min and max of every metric over the
    /// whole set are collected before any run is scored. The sort is stable,
    /// so runs with equal composite scores keep their input order.
    #[tracing::instrument(name = "rank_runs", skip_all, fields(runs = runs.len()))]
    pub fn rank(&self, runs: &[RankingInput]) -> RankingResult {
        if runs.is_empty() {
            return RankingResult::default();
        }

        let best = BestInClass {
            total_return: find_leader(runs, |p| p.total_return_pct, |a, b| a > b),
            sharpe_ratio: find_leader(runs, |p| p.sharpe_ratio, |a, b| a > b),
            max_drawdown: find_leader(runs, |p| p.max_drawdown_pct, |a, b| a < b),
            total_trades: find_leader(runs, |p| Decimal::from(p.total_trades), |a, b| a > b),
        };

        let return_scores = normalized_scores(runs, |p| p.total_return_pct);
        let sharpe_scores = normalized_scores(runs, |p| p.sharpe_ratio);
        // Lower drawdown is better, so it is negated before normalizing.
        let drawdown_scores = normalized_scores(runs, |p| -p.max_drawdown_pct);
        let win_rate_scores = normalized_scores(runs, |p| p.win_rate);

        let w = &self.weights;
        let mut rankings: Vec<RankingEntry> = runs
            .iter()
            .enumerate()
            .map(|(i, run)| {
                let scores = MetricScores {
                    total_return: return_scores[i],
                    sharpe_ratio: sharpe_scores[i],
                    max_drawdown: drawdown_scores[i],
                    win_rate: win_rate_scores[i],
                };
                let composite_score = (scores.total_return * w.total_return)
                    + (scores.sharpe_ratio * w.sharpe_ratio)
                    + (scores.max_drawdown * w.max_drawdown)
                    + (scores.win_rate * w.win_rate);

                RankingEntry {
                    rank: 0,
                    run_id: run.run_id,
                    name: run.name.clone(),
                    composite_score,
                    scores,
                    performance: run.performance.clone(),
                }
            })
            .collect();

        rankings.sort_by(|a, b| b.composite_score.cmp(&a.composite_score));
        for (position, entry) in rankings.iter_mut().enumerate() {
            entry.rank = position + 1;
        }

        tracing::debug!(
            leader = %rankings[0].name,
            score = %rankings[0].composite_score,
            "Ranked backtest runs."
        );

        RankingResult { best, rankings }
    }
}

/// Linear scan for the run with the best value; the first run wins ties.
fn find_leader<F, B>(runs: &[RankingInput], accessor: F, is_better: B) -> Option<MetricLeader>
where
    F: Fn(&BacktestPerformance) -> Decimal,
    B: Fn(Decimal, Decimal) -> bool,
{
    let mut leader: Option<(&RankingInput, Decimal)> = None;
    for run in runs {
        let value = accessor(&run.performance);
        match leader {
            Some((_, best)) if !is_better(value, best) => {}
            _ => leader = Some((run, value)),
        }
    }

    leader.map(|(run, value)| MetricLeader {
        run_id: run.run_id,
        name: run.name.clone(),
        value,
    })
}

/// Scores one metric of every run on a 0-100 scale.
fn normalized_scores<F>(runs: &[RankingInput], accessor: F) -> Vec<Decimal>
where
    F: Fn(&BacktestPerformance) -> Decimal,
{
    let (min, max) = find_min_max(runs, &accessor);
    runs.iter()
        .map(|r| normalize(accessor(&r.performance), min, max))
        .collect()
}

/// A helper function to find the min and max of a specific metric across runs.
fn find_min_max<F>(runs: &[RankingInput], accessor: F) -> (Decimal, Decimal)
where
    F: Fn(&BacktestPerformance) -> Decimal,
{
    runs.iter()
        .map(|r| accessor(&r.performance))
        .fold((Decimal::MAX, Decimal::MIN), |(min, max), val| {
            (min.min(val), max.max(val))
        })
}

/// Normalizes a value to a 0-100 scale.
fn normalize(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    if min == max {
        return NEUTRAL_SCORE; // Avoid division by zero if all values are the same
    }
    (value - min) / (max - min) * Decimal::ONE_HUNDRED
}
