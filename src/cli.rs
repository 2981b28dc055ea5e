//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::filter::EmptySelection;
use clap::Parser;
use std::path::PathBuf;

/// AlumniTrace - graduate employability dashboard
///
/// Loads graduate records from the analytics backend, filters them by
/// program and employer, and renders KPIs, top-N charts and the
/// employer x department matrix as a Markdown or JSON report.
///
/// Examples:
///   alumnitrace
///   alumnitrace --api-url http://10.0.0.5:8000 --career "Derecho"
///   alumnitrace --input graduates.json --format json -o dashboard.json
///   alumnitrace --list-careers
///   alumnitrace --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the analytics backend
    ///
    /// Overrides the config file. Default: http://localhost:8000
    #[arg(long, value_name = "URL", env = "ALUMNITRACE_API_URL")]
    pub api_url: Option<String>,

    /// Read graduate rows from a local JSON file instead of the backend
    ///
    /// Takes precedence over --api-url.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Program(s) to include (repeatable or comma-separated)
    ///
    /// Example: --career "Derecho,Psicología"
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub career: Vec<String>,

    /// Select every program present in the data
    #[arg(long, conflicts_with = "career")]
    pub all_careers: bool,

    /// Restrict to graduates working at this employer (exact match)
    #[arg(long, value_name = "NAME")]
    pub company: Option<String>,

    /// Clear an employer filter set in the config file
    #[arg(long, conflicts_with = "company")]
    pub any_company: bool,

    /// Meaning of an empty program selection (all, none)
    #[arg(long, value_name = "POLICY")]
    pub empty_selection: Option<EmptySelection>,

    /// Output file path for the report (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of generated records when falling back to sample data
    #[arg(long, value_name = "COUNT")]
    pub sample_size: Option<usize>,

    /// Seed for the sample data generator
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Fail instead of falling back to sample data
    #[arg(long)]
    pub no_fallback: bool,

    /// Print the program catalogue with record counts and exit
    #[arg(long)]
    pub list_careers: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .alumnitrace.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .alumnitrace.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.sample_size == Some(0) {
            return Err("Sample size must be at least 1".to_string());
        }

        if self.career.iter().any(|c| c.trim().is_empty()) {
            return Err("Career names cannot be empty".to_string());
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            api_url: None,
            input: None,
            career: Vec::new(),
            all_careers: false,
            company: None,
            any_company: false,
            empty_selection: None,
            output: None,
            format: OutputFormat::Markdown,
            timeout: None,
            sample_size: None,
            seed: None,
            no_fallback: false,
            list_careers: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_careers() {
        let args = Args::try_parse_from([
            "alumnitrace",
            "--career",
            "Derecho,Psicología",
            "--career",
            "Periodismo",
            "--empty-selection",
            "none",
        ])
        .unwrap();
        assert_eq!(args.career, vec!["Derecho", "Psicología", "Periodismo"]);
        assert_eq!(args.empty_selection, Some(EmptySelection::None));
    }

    #[test]
    fn test_conflicting_selection_flags() {
        assert!(Args::try_parse_from(["alumnitrace", "--career", "Derecho", "--all-careers"]).is_err());
        assert!(Args::try_parse_from(["alumnitrace", "--company", "Bci", "--any-company"]).is_err());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.api_url = Some("localhost:8000".to_string());
        assert!(args.validate().is_err());

        args.api_url = Some("https://alumni.example.cl".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.sample_size = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/nonexistent/graduates.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
