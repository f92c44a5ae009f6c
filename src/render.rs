use analytics::{AdvancedMetrics, PerformanceMetrics};
use analyzer::{ComparisonReport, MetricLeader, RankingResult};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use regime::RegimePerformance;
use rust_decimal::Decimal;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h)));
    table
}

fn number(value: Decimal) -> Cell {
    Cell::new(value.round_dp(2).normalize()).set_alignment(CellAlignment::Right)
}

fn count(value: usize) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

pub fn metrics_table(metrics: &PerformanceMetrics) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    table
        .add_row(vec![Cell::new("Total Return"), number(metrics.total_return)])
        .add_row(vec![Cell::new("Sharpe Ratio"), Cell::new(metrics.sharpe_ratio)])
        .add_row(vec![Cell::new("Max Drawdown %"), number(metrics.max_drawdown)])
        .add_row(vec![Cell::new("Win Rate %"), number(metrics.win_rate)])
        .add_row(vec![Cell::new("Profit Factor"), number(metrics.profit_factor)])
        .add_row(vec![Cell::new("Average Win"), number(metrics.average_win)])
        .add_row(vec![Cell::new("Average Loss"), number(metrics.average_loss)])
        .add_row(vec![Cell::new("Total Trades"), count(metrics.total_trades)])
        .add_row(vec![Cell::new("Winning Trades"), count(metrics.winning_trades)])
        .add_row(vec![Cell::new("Losing Trades"), count(metrics.losing_trades)]);
    table
}

pub fn regimes_table(regimes: &[RegimePerformance]) -> Table {
    let mut table = new_table(&[
        "Regime",
        "Executions",
        "Occurrences",
        "Avg Days",
        "Total Return",
        "Win Rate %",
        "Max DD %",
        "Sharpe",
    ]);
    for regime in regimes {
        table.add_row(vec![
            Cell::new(&regime.regime),
            count(regime.execution_count),
            count(regime.occurrences),
            Cell::new(regime.average_duration_days).set_alignment(CellAlignment::Right),
            number(regime.metrics.total_return),
            number(regime.metrics.win_rate),
            number(regime.metrics.max_drawdown),
            Cell::new(regime.metrics.sharpe_ratio).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn ranking_table(ranking: &RankingResult) -> Table {
    let mut table = new_table(&[
        "Rank", "Run", "Score", "Return %", "Sharpe", "Max DD %", "Win Rate %", "Trades",
    ]);
    for entry in &ranking.rankings {
        let p = &entry.performance;
        table.add_row(vec![
            count(entry.rank),
            Cell::new(&entry.name),
            number(entry.composite_score),
            number(p.total_return_pct),
            number(p.sharpe_ratio),
            number(p.max_drawdown_pct),
            number(p.win_rate),
            count(p.total_trades),
        ]);
    }
    table
}

pub fn best_in_class_table(ranking: &RankingResult) -> Table {
    let mut table = new_table(&["Metric", "Run", "Value"]);
    let best = &ranking.best;
    let rows: [(&str, &Option<MetricLeader>); 4] = [
        ("Highest Return %", &best.total_return),
        ("Highest Sharpe", &best.sharpe_ratio),
        ("Lowest Max DD %", &best.max_drawdown),
        ("Most Trades", &best.total_trades),
    ];
    for (label, leader) in rows {
        if let Some(leader) = leader {
            table.add_row(vec![Cell::new(label), Cell::new(&leader.name), number(leader.value)]);
        }
    }
    table
}

pub fn risk_table(report: &ComparisonReport) -> Table {
    let mut table = new_table(&[
        "Run",
        "Ulcer",
        "Gain/Pain",
        "Recovery",
        "Avg Month %",
        "Best Month %",
        "Worst Month %",
        "Win Streak",
        "Loss Streak",
        "P(Success) %",
    ]);
    for profile in &report.risk_profiles {
        let m: &AdvancedMetrics = &profile.metrics;
        table.add_row(vec![
            Cell::new(&profile.name),
            number(m.ulcer_index),
            number(m.gain_to_pain_ratio),
            number(m.recovery_factor),
            number(m.average_monthly_return),
            number(m.best_month),
            number(m.worst_month),
            count(m.max_consecutive_wins),
            count(m.max_consecutive_losses),
            number(m.probability_of_success),
        ]);
    }
    table
}

pub fn correlation_table(report: &ComparisonReport) -> Table {
    let matrix = &report.correlations;
    let mut header = vec![""];
    header.extend(matrix.runs.iter().map(String::as_str));
    let mut table = new_table(&header);
    for (name, row) in matrix.runs.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(name)];
        cells.extend(row.iter().map(|v| number(*v)));
        table.add_row(cells);
    }
    table
}

/// One line per validation failure, prefixed by the run name.
pub fn validation_lines(report: &ComparisonReport) -> Vec<String> {
    report
        .validations
        .iter()
        .flat_map(|v| v.report.errors.iter().map(move |e| format!("{}: {}", v.name, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_metrics_table_lists_every_field() {
        let metrics = PerformanceMetrics {
            total_return: dec!(100),
            win_rate: dec!(50.0),
            total_trades: 2,
            winning_trades: 1,
            losing_trades: 1,
            ..Default::default()
        };
        let rendered = metrics_table(&metrics).to_string();
        assert!(rendered.contains("Total Return"));
        assert!(rendered.contains("Losing Trades"));
        assert!(rendered.contains("100"));
    }

    #[test]
    fn test_empty_ranking_renders_header_only() {
        let rendered = ranking_table(&RankingResult::default()).to_string();
        assert!(rendered.contains("Rank"));
        assert_eq!(best_in_class_table(&RankingResult::default()).row_iter().count(), 0);
    }
}
