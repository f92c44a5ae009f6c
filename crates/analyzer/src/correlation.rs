use core_types::EquityPoint;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

/// Pairwise return correlations of a set of runs, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub runs: Vec<String>,
    pub values: Vec<Vec<Decimal>>,
}

/// Pearson correlation of the period returns of two equity curves.
///
/// The curves must have the same length and at least two points; anything
/// else, or a flat curve with no variance, yields zero.
pub fn correlation(a: &[EquityPoint], b: &[EquityPoint]) -> Decimal {
    if a.len() != b.len() || a.len() < 2 {
        return Decimal::ZERO;
    }

    let returns_a = period_returns(a);
    let returns_b = period_returns(b);
    let n = Decimal::from(returns_a.len());
    let mean_a = returns_a.iter().sum::<Decimal>() / n;
    let mean_b = returns_b.iter().sum::<Decimal>() / n;

    let mut covariance = Decimal::ZERO;
    let mut variance_a = Decimal::ZERO;
    let mut variance_b = Decimal::ZERO;
    for (ra, rb) in returns_a.iter().zip(&returns_b) {
        let da = *ra - mean_a;
        let db = *rb - mean_b;
        covariance += da * db;
        variance_a += da * da;
        variance_b += db * db;
    }

    let denominator = match (variance_a.sqrt(), variance_b.sqrt()) {
        (Some(sd_a), Some(sd_b)) => sd_a * sd_b,
        _ => Decimal::ZERO,
    };
    if denominator.is_zero() {
        return Decimal::ZERO;
    }

    (covariance / denominator).clamp(Decimal::NEGATIVE_ONE, Decimal::ONE)
}

/// Symmetric correlation matrix over every pair of named curves.
pub fn correlation_matrix(curves: &[(&str, &[EquityPoint])]) -> CorrelationMatrix {
    let size = curves.len();
    let mut values = vec![vec![Decimal::ZERO; size]; size];

    for i in 0..size {
        for j in i..size {
            let value = correlation(curves[i].1, curves[j].1);
            values[i][j] = value;
            values[j][i] = value;
        }
    }

    CorrelationMatrix {
        runs: curves.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

/// Simple returns between consecutive equity values; the first point has no
/// predecessor and is skipped.
fn period_returns(curve: &[EquityPoint]) -> Vec<Decimal> {
    curve
        .windows(2)
        .map(|w| {
            if w[0].equity.is_zero() {
                Decimal::ZERO
            } else {
                (w[1].equity - w[0].equity) / w[0].equity
            }
        })
        .collect()
}
