//! One analysis run: load inputs, analyze, return diagnostics.

use crate::args::CliArgs;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use throwdoc_checker::{
    AnalysisContext, Analyzer, AnalyzerConfig, CONFIG_FILE_NAME, CancellationToken,
    DocumentationCache, RuleSources,
};
use throwdoc_common::{Diagnostic, DiagnosticCategory};
use throwdoc_model::Program;
use throwdoc_rules::{RuleSet, builtin_rules, is_adjustment_file, load_rule_files};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct RunResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Adjustment files that were read, in load order.
    pub rule_files: Vec<PathBuf>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let program_path = cwd.join(&args.program);
    let text = std::fs::read_to_string(&program_path)
        .with_context(|| format!("failed to read program dump {}", program_path.display()))?;
    let program = Program::from_json(&text)
        .with_context(|| format!("failed to load program dump {}", program_path.display()))?;
    info!(declarations = program.len(), "program loaded");

    let mut config = load_config(args, cwd)?;
    if args.no_builtin_rules {
        config.include_builtin_rules = false;
    }

    let rule_files = collect_rule_files(&args.inputs, cwd)?;
    let project = load_rule_files(&rule_files)?;
    let builtin = if config.include_builtin_rules {
        builtin_rules()
    } else {
        RuleSet::new()
    };
    debug!(builtin = builtin.len(), project = project.len(), "rules loaded");

    let cx = AnalysisContext::new(
        Arc::new(program),
        RuleSources::new(builtin, project),
        Arc::new(DocumentationCache::new()),
        &config,
    );
    let analyzer = Analyzer::new(cx, config);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .context("failed to start worker threads")?;
    let cancel = CancellationToken::new();
    let diagnostics = pool.install(|| analyzer.analyze(&cancel))?;

    Ok(RunResult {
        diagnostics,
        rule_files,
    })
}

/// `--config` when given, else `throwdoc.json` in `cwd` when present, else
/// defaults.
fn load_config(args: &CliArgs, cwd: &Path) -> Result<AnalyzerConfig> {
    let path = match &args.config {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            path
        }
        None => {
            let path = cwd.join(CONFIG_FILE_NAME);
            if !path.is_file() {
                return Ok(AnalyzerConfig::default());
            }
            path
        }
    };
    debug!(path = %path.display(), "loading config");
    AnalyzerConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Adjustment files among `inputs`. Directories are searched recursively in
/// file-name order; other inputs are passed through and filtered by name.
pub fn collect_rule_files(inputs: &[PathBuf], cwd: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = cwd.join(input);
        if !path.is_dir() {
            files.push(path);
            continue;
        }
        for entry in WalkDir::new(&path).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && is_adjustment_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.retain(|path| is_adjustment_file(path));
    Ok(files)
}
