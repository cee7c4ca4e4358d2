//! Report configuration.
//!
//! ```
//! use equilib::config::ReportConfig;
//!
//! let config = ReportConfig::from_json_str(r#"{ "timing": true }"#).unwrap();
//! assert!(config.timing);
//! assert_eq!(config.rule_width, 80);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Options controlling report layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Print measured times; otherwise a placeholder is shown
    pub timing: bool,
    /// Width of the banner and species-table rules
    pub rule_width: usize,
    /// Append the per-call counters block to the report
    pub include_counters: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig { timing: false, rule_width: 80, include_counters: true }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }

    pub fn with_counters(mut self, include: bool) -> Self {
        self.include_counters = include;
        self
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        serde_json::from_str(json).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Loads a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Loads a JSON file, falling back to defaults if it is missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(error = %e, "using default report configuration");
                Self::default()
            }
        }
    }
}
