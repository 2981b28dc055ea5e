//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.alumnitrace.toml` files.

use crate::filter::EmptySelection;
use crate::models::MissingPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".alumnitrace.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Fallback sample dataset settings.
    #[serde(default)]
    pub sample: SampleConfig,

    /// Initial selection.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Per-chart cutoffs.
    #[serde(default)]
    pub charts: ChartsConfig,

    /// Employer x department matrix settings.
    #[serde(default)]
    pub matrix: MatrixConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the analytics backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the graduates endpoint.
    #[serde(default = "default_path")]
    pub path: String,

    /// Request timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
            timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    /// Full URL of the graduates endpoint.
    pub fn graduates_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_path() -> String {
    "/analytics/graduates".to_string()
}

/// Sample dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Fall back to generated data when loading fails.
    #[serde(default = "default_true")]
    pub fallback: bool,

    /// Number of generated records.
    #[serde(default = "default_sample_size")]
    pub size: usize,

    /// RNG seed for reproducible samples.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            fallback: true,
            size: default_sample_size(),
            seed: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sample_size() -> usize {
    1000
}

/// Initial selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Whether an empty program set shows every record.
    #[serde(default = "default_true")]
    pub empty_means_all: bool,

    /// Programs selected at startup.
    #[serde(default)]
    pub careers: Vec<String>,

    /// Employer filter at startup.
    #[serde(default)]
    pub company: Option<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            empty_means_all: true,
            careers: Vec::new(),
            company: None,
        }
    }
}

impl SelectionConfig {
    pub fn empty_policy(&self) -> EmptySelection {
        EmptySelection::from_flag(self.empty_means_all)
    }
}

/// Cutoff and missing-value policy of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Number of labels kept verbatim.
    pub top_n: usize,
    /// Treatment of records lacking the field.
    pub missing: MissingPolicy,
}

impl ChartConfig {
    pub const fn new(top_n: usize, missing: MissingPolicy) -> Self {
        Self { top_n, missing }
    }
}

/// Per-chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    #[serde(default = "default_industry_chart")]
    pub industry: ChartConfig,

    #[serde(default = "default_employer_chart")]
    pub employer: ChartConfig,

    #[serde(default = "default_role_chart")]
    pub role: ChartConfig,

    #[serde(default = "default_department_chart")]
    pub department: ChartConfig,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            industry: default_industry_chart(),
            employer: default_employer_chart(),
            role: default_role_chart(),
            department: default_department_chart(),
        }
    }
}

fn default_industry_chart() -> ChartConfig {
    ChartConfig::new(5, MissingPolicy::Fold)
}

fn default_employer_chart() -> ChartConfig {
    ChartConfig::new(5, MissingPolicy::Drop)
}

fn default_role_chart() -> ChartConfig {
    ChartConfig::new(6, MissingPolicy::Drop)
}

fn default_department_chart() -> ChartConfig {
    ChartConfig::new(5, MissingPolicy::Fold)
}

/// Matrix settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Employers shown as individual rows.
    #[serde(default = "default_matrix_top")]
    pub top_rows: usize,

    /// Departments shown as individual columns.
    #[serde(default = "default_matrix_top")]
    pub top_cols: usize,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            top_rows: default_matrix_top(),
            top_cols: default_matrix_top(),
        }
    }
}

fn default_matrix_top() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.alumnitrace.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, and only
    /// when they were actually provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Flag or ALUMNITRACE_API_URL (clap reads the env var)
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = Some(timeout);
        }

        if let Some(size) = args.sample_size {
            self.sample.size = size;
        }
        if args.seed.is_some() {
            self.sample.seed = args.seed;
        }
        if args.no_fallback {
            self.sample.fallback = false;
        }

        if !args.career.is_empty() {
            self.selection.careers = args.career.clone();
        }
        if let Some(ref company) = args.company {
            self.selection.company = Some(company.clone());
        }
        if let Some(policy) = args.empty_selection {
            self.selection.empty_means_all = policy == EmptySelection::All;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
