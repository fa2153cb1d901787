use crate::app::ports::CompatibilitySource;
use crate::pipeline::processing::compatibility::DeterminesRow;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// File-based implementation of [`CompatibilitySource`].
///
/// Expects a JSON array of `{powersource_id, component_id,
/// component_category}` rows exported from the relationship store. Read or
/// parse failures surface as errors here; the compatibility index turns
/// them into an empty (conservative) index.
pub struct JsonDeterminesSource {
    path: PathBuf,
}

impl JsonDeterminesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CompatibilitySource for JsonDeterminesSource {
    fn load_determines(&self) -> Result<Vec<DeterminesRow>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading DETERMINES rules from {}", self.path.display()))?;
        let rows: Vec<DeterminesRow> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing DETERMINES rules from {}", self.path.display()))?;
        Ok(rows)
    }
}
