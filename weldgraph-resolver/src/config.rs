use crate::common::constants;
use crate::common::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a resolution run.
///
/// Loaded from an optional TOML file; every field has a compiled-in default
/// so a bare `weldgraph-resolver resolve` works without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Power source GINs known to be self-contained all-in-one units.
    pub integrated_units: Vec<String>,
    /// Reserved placeholder GIN for "no separate feeder required".
    pub no_feeder_gin: String,
    /// Reserved placeholder GIN for "no separate cooler required".
    pub no_cooler_gin: String,
    /// When true, lines referencing products absent from the catalog are
    /// skipped (counted, not errored).
    pub validate_references: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            integrated_units: constants::DEFAULT_INTEGRATED_UNITS
                .iter()
                .map(|gin| gin.to_string())
                .collect(),
            no_feeder_gin: constants::NO_FEEDER_REQUIRED_GIN.to_string(),
            no_cooler_gin: constants::NO_COOLER_REQUIRED_GIN.to_string(),
            validate_references: true,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load from an optional path, falling back to defaults when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
