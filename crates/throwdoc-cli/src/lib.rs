//! Command-line driver: loads a front-end program dump and adjustment rule
//! files, runs the analyzer, and reports diagnostics.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
