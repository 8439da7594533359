use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;
use throwdoc_common::diagnostics::get_diagnostic_message;
use throwdoc_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
    show_hidden: bool,
    /// Line start offsets per file; `None` when the file is unreadable.
    line_starts: HashMap<String, Option<Vec<u32>>>,
}

impl Reporter {
    pub fn new(color: bool, show_hidden: bool) -> Self {
        Reporter {
            color,
            show_hidden,
            line_starts: HashMap::new(),
        }
    }

    pub fn is_shown(&self, diagnostic: &Diagnostic) -> bool {
        self.show_hidden || diagnostic.category != DiagnosticCategory::Hidden
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            if !self.is_shown(diagnostic) {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn render_json(&self, diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
        let shown: Vec<&Diagnostic> = diagnostics.iter().filter(|d| self.is_shown(d)).collect();
        serde_json::to_string_pretty(&shown)
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.format_location(&diagnostic.file, diagnostic.start) {
            Some(location) => location,
            None if !diagnostic.file.is_empty() => diagnostic.file.clone(),
            None => "<program>".to_string(),
        };
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);
        output
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }
        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{file}:{line}:{column}"))
    }

    /// One-based line and column of `offset`.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let starts = self
            .line_starts
            .entry(file.to_string())
            .or_insert_with(|| {
                std::fs::read_to_string(Path::new(file))
                    .ok()
                    .map(|source| line_starts(&source))
            })
            .as_ref()?;
        let line = starts.partition_point(|&start| start <= offset).max(1);
        let column = offset - starts[line - 1];
        Some((line as u32, column + 1))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Info => label.cyan().bold().to_string(),
            DiagnosticCategory::Hidden => label.dimmed().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = get_diagnostic_message(code)
            .map_or_else(|| code.to_string(), |message| message.id.to_string());
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

fn line_starts(source: &str) -> Vec<u32> {
    std::iter::once(0)
        .chain(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(index, _)| index as u32 + 1),
        )
        .collect()
}
