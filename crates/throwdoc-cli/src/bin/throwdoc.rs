#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use throwdoc_cli::args::{CliArgs, OutputFormat};
use throwdoc_cli::{driver, reporter::Reporter, tracing_config};

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERRORS_REPORTED: i32 = 1;

fn main() -> Result<()> {
    // Zero cost unless THROWDOC_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let result = driver::run(&args, &cwd)?;

    let color = args
        .pretty
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    let mut reporter = Reporter::new(color, args.show_hidden);
    match args.format {
        OutputFormat::Json => {
            let json = reporter
                .render_json(&result.diagnostics)
                .context("failed to serialize diagnostics")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let rendered = reporter.render(&result.diagnostics);
            if !rendered.is_empty() {
                println!("{rendered}");
            }
            let shown = result
                .diagnostics
                .iter()
                .filter(|d| reporter.is_shown(d))
                .count();
            if shown > 0 {
                eprintln!("\nFound {shown} problem(s).");
            }
        }
    }

    let status = if result.has_errors() {
        EXIT_ERRORS_REPORTED
    } else {
        EXIT_SUCCESS
    };
    std::process::exit(status);
}
