//! Rule file naming convention and loading.
//!
//! Rule files are recognized among arbitrary inputs by name:
//! `ExceptionAdjustments*.txt` (case-insensitive). The canonical default
//! file loads first; the others keep their supplied order.

use crate::rule_set::RuleSet;
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_FILE_NAME: &str = "ExceptionAdjustments.txt";

const FILE_PATTERN: &str = "ExceptionAdjustments*.txt";

#[derive(Debug, thiserror::Error)]
pub enum RuleLoadError {
    #[error("failed to read adjustment file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn file_matcher() -> Option<GlobMatcher> {
    GlobBuilder::new(FILE_PATTERN)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .ok()
        .map(|glob| glob.compile_matcher())
}

/// Whether `path` names an adjustment rule file.
pub fn is_adjustment_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    file_matcher().is_some_and(|matcher| matcher.is_match(Path::new(name)))
}

fn is_default_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(DEFAULT_FILE_NAME))
}

/// Select rule files among `inputs`, default file first.
pub fn select_rule_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = inputs
        .iter()
        .filter(|path| is_adjustment_file(path))
        .cloned()
        .collect();
    // Stable: non-default files keep their relative order.
    files.sort_by_key(|path| !is_default_file(path));
    files
}

/// Load and compose every rule file among `inputs`.
pub fn load_rule_files(inputs: &[PathBuf]) -> Result<RuleSet, RuleLoadError> {
    let mut sources = Vec::new();
    for path in select_rule_files(inputs) {
        let text = std::fs::read_to_string(&path).map_err(|source| RuleLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let set = RuleSet::parse(&path.display().to_string(), &text);
        debug!(path = %path.display(), rules = set.len(), "loaded adjustment file");
        sources.push(set);
    }
    Ok(RuleSet::compose(sources))
}
