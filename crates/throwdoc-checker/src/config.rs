//! Analyzer configuration (`throwdoc.json`).
//!
//! ```json
//! {
//!   "intransitive": ["T:System.ArgumentException"],
//!   "report_delegate_creation": true,
//!   "severity": { "THROW003": "error", "9001": "none" },
//!   "include_builtin_rules": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use throwdoc_common::DiagnosticCategory;
use throwdoc_common::diagnostics::{code_for_id, get_diagnostic_message};

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "throwdoc.json";

/// Upper bound on configuration file size.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Type ids whose propagation through a call is suppressed unless the
    /// callee is a throw-helper. Subclasses are included.
    pub intransitive: Vec<String>,
    /// Report propagation through delegate creation as information instead
    /// of a hidden diagnostic.
    pub report_delegate_creation: bool,
    /// Severity overrides keyed by diagnostic id (`THROW001`) or code
    /// (`9001`); `none` hides the diagnostic.
    pub severity: BTreeMap<String, String>,
    pub include_builtin_rules: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            intransitive: vec![
                "T:System.ArgumentException".to_string(),
                "T:System.InvalidOperationException".to_string(),
            ],
            report_delegate_creation: false,
            severity: BTreeMap::new(),
            include_builtin_rules: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        let size = std::fs::metadata(path).map_err(io_error)?.len();
        if size > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let text = std::fs::read_to_string(path).map_err(io_error)?;
        Self::from_json(&text)
    }

    /// Check that every severity override names a known diagnostic and a
    /// known severity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in &self.severity {
            if parse_code(key).is_none() {
                return Err(ConfigError::Invalid(format!("unknown diagnostic '{key}'")));
            }
            if DiagnosticCategory::parse(value).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "unknown severity '{value}' for '{key}'"
                )));
            }
        }
        for id in &self.intransitive {
            if !id.starts_with("T:") {
                return Err(ConfigError::Invalid(format!(
                    "intransitive entry '{id}' is not a type id"
                )));
            }
        }
        Ok(())
    }

    /// Configured severity for a diagnostic code.
    pub fn severity_for(&self, code: u32) -> Option<DiagnosticCategory> {
        self.severity
            .iter()
            .find(|(key, _)| parse_code(key) == Some(code))
            .and_then(|(_, value)| DiagnosticCategory::parse(value))
    }
}

fn parse_code(key: &str) -> Option<u32> {
    match key.parse::<u32>() {
        Ok(code) => get_diagnostic_message(code).map(|message| message.code),
        Err(_) => code_for_id(key),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
