use chrono::{DateTime, Utc};
use core_types::RegimeChangeEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous interval during which one regime was active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimePeriod {
    pub regime_id: i64,
    pub regime_name: String,
    pub start: DateTime<Utc>,
    /// Start of the following period. `None` while the regime is still the
    /// latest one known.
    pub end: Option<DateTime<Utc>>,
    pub duration_hours: Option<Decimal>,
}

impl RegimePeriod {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whether `timestamp` falls inside the period. Both bounds are
    /// inclusive, so an execution stamped exactly on a regime change
    /// belongs to the period that is ending.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && self.end.is_none_or(|end| timestamp <= end)
    }
}

/// Turns an ordered list of regime-change events into consecutive periods.
///
/// Events must already be sorted by start time; nothing is reordered here.
/// Each period ends where the next one starts and the last stays open.
pub fn build_periods(events: &[RegimeChangeEvent]) -> Vec<RegimePeriod> {
    let starts: Vec<DateTime<Utc>> = events.iter().map(|e| e.effective_start()).collect();

    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let start = starts[i];
            let end = starts.get(i + 1).copied();
            let duration_hours = event.duration_hours.or_else(|| {
                end.map(|end| Decimal::from((end - start).num_seconds()) / Decimal::from(3_600))
            });

            RegimePeriod {
                regime_id: event.regime_id,
                regime_name: event.regime_name.clone(),
                start,
                end,
                duration_hours,
            }
        })
        .collect()
}
