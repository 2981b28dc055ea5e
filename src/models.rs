//! Data models for the alumni dashboard.
//!
//! This module contains the core data structures used throughout
//! the application: raw backend rows, normalized graduate records,
//! the active selection and every derived aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Label given to a program that was blank or a sentinel upstream.
pub const NO_DATA_LABEL: &str = "Sin dato";

/// Bucket label for records whose grouped field is absent.
pub const MISSING_LABEL: &str = "Sin información";

/// Synthetic bucket absorbing every group beyond the top N.
pub const OTHERS_LABEL: &str = "Otros";

/// Catch-all row of the employer x department matrix.
pub const OTHER_COMPANIES_LABEL: &str = "Otras empresas";

/// Catch-all column of the employer x department matrix.
pub const OTHER_DEPARTMENTS_LABEL: &str = "Otros departamentos";

/// One graduate row as served by `GET /analytics/graduates`.
///
/// Every text field defaults to empty (missing key or `null`) so a sparse
/// payload still decodes; coercion happens in the normalizer rather than here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraduate {
    /// National identifier.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rut: String,
    /// Undergraduate program.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub career: String,
    /// Graduation date (ISO text).
    #[serde(default)]
    pub graduation_date: Option<String>,
    /// Whether the graduate holds a current job.
    #[serde(default, deserialize_with = "null_as_false")]
    pub work_current: bool,
    /// Country of residence.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country: String,
    /// Current employer.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    /// Department inside the employer.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub department: String,
    /// Job title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    /// Employer's industry.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub industry: String,
    /// Start date of the current job (ISO text).
    #[serde(default)]
    pub job_start_date: Option<String>,
}

/// JSON `null` reads as an empty string, same as a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// A normalized graduate profile.
///
/// Optional fields are either trimmed, meaningful text or `None`; never
/// whitespace or a sentinel string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduateRecord {
    pub id: String,
    pub career: String,
    pub employed_first_year: bool,
    pub industry: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
}

/// The user's current filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected program names. Order is irrelevant.
    pub careers: BTreeSet<String>,
    /// Optional exact-match employer filter.
    pub company: Option<String>,
}

#[cfg(test)]
impl Selection {
    /// Selection restricted to the given programs.
    pub fn with_careers<I, S>(careers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            careers: careers.into_iter().map(Into::into).collect(),
            company: None,
        }
    }
}

/// A (label, count) pair produced by grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

impl Bucket {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// How an aggregator treats records whose field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Count absent values under [`MISSING_LABEL`] and roll overflow into [`OTHERS_LABEL`].
    Fold,
    /// Skip absent values and truncate to the top N.
    Drop,
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicy::Fold => write!(f, "fold"),
            MissingPolicy::Drop => write!(f, "drop"),
        }
    }
}

/// Headline indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Number of filtered records.
    pub total: usize,
    /// Percentage (0..=100) employed within the first year; 0 when empty.
    pub employment_rate: f64,
}

/// Employer x department co-occurrence grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    /// Top employers followed by [`OTHER_COMPANIES_LABEL`].
    pub rows: Vec<String>,
    /// Top departments followed by [`OTHER_DEPARTMENTS_LABEL`].
    pub cols: Vec<String>,
    /// Dense `rows.len() x cols.len()` counts.
    pub cells: Vec<Vec<usize>>,
}

impl CrossTab {
    /// Count at (row, col). Out-of-range indices read as zero.
    pub fn get(&self, row: usize, col: usize) -> usize {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    pub fn row_total(&self, row: usize) -> usize {
        self.cells.get(row).map(|r| r.iter().sum()).unwrap_or(0)
    }

    pub fn col_total(&self, col: usize) -> usize {
        self.cells.iter().map(|r| r.get(col).copied().unwrap_or(0)).sum()
    }

    /// Sum of every cell.
    pub fn grand_total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }
}

/// Everything the report renders, derived from (records, selection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub selection: Selection,
    pub kpis: Kpis,
    pub industries: Vec<Bucket>,
    pub companies: Vec<Bucket>,
    pub roles: Vec<Bucket>,
    pub departments: Vec<Bucket>,
    pub matrix: CrossTab,
}

/// Where the records behind a dashboard came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataOrigin {
    /// Served by the backend at this URL.
    Backend { url: String },
    /// Read from a local JSON file.
    File { path: String },
    /// Generated sample data, used after a failed load.
    Sample { error: String },
}

impl DataOrigin {
    /// The user-visible load error, if the sample fallback was used.
    pub fn error(&self) -> Option<&str> {
        match self {
            DataOrigin::Sample { error } => Some(error.as_str()),
            _ => None,
        }
    }
}

/// Metadata about a rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the records came from.
    pub origin: DataOrigin,
    /// Number of records loaded before filtering.
    pub records_loaded: usize,
}

/// A dashboard together with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub dashboard: Dashboard,
}
