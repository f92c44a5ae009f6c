use anyhow::{Context, Result};
use core_types::{Execution, RawExecution, RegimeChangeEvent};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Reads a JSON document from disk.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Loads raw execution rows and converts them into validated executions.
pub fn load_executions(path: &Path) -> Result<Vec<Execution>> {
    let rows: Vec<RawExecution> = read_json(path)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            Execution::try_from(row)
                .with_context(|| format!("Invalid execution #{} in {}", i, path.display()))
        })
        .collect()
}

/// Loads regime-change events in the order the regime segmenter expects.
pub fn load_regime_events(path: &Path) -> Result<Vec<RegimeChangeEvent>> {
    let mut events: Vec<RegimeChangeEvent> = read_json(path)?;
    events.sort_by_key(|e| e.effective_start());
    tracing::debug!(events = events.len(), "Loaded regime-change events.");
    Ok(events)
}
