//! Bucket aggregation and headline statistics.
//!
//! Every chart shares one shape: group the filtered records by a field,
//! rank groups by count (ties keep first-seen order), keep the top N and
//! optionally roll the remainder into an "Otros" bucket.

use crate::config::ChartConfig;
use crate::models::{Bucket, GraduateRecord, Kpis, MissingPolicy, MISSING_LABEL, OTHERS_LABEL};
use indexmap::IndexMap;

/// A categorical field that can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Career,
    Industry,
    Company,
    Department,
    Role,
}

impl Field {
    /// The field's value on `record`, `None` when absent.
    pub fn value<'a>(&self, record: &'a GraduateRecord) -> Option<&'a str> {
        match self {
            Field::Career => Some(record.career.as_str()),
            Field::Industry => record.industry.as_deref(),
            Field::Company => record.company.as_deref(),
            Field::Department => record.department.as_deref(),
            Field::Role => record.role.as_deref(),
        }
    }
}

/// Count occurrences of `field`, in first-seen label order.
///
/// With [`MissingPolicy::Fold`] absent values are counted under
/// [`MISSING_LABEL`]; with [`MissingPolicy::Drop`] they are skipped.
pub fn count_by(
    records: &[&GraduateRecord],
    field: Field,
    missing: MissingPolicy,
) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for record in records {
        let label = match (field.value(record), missing) {
            (Some(value), _) => value,
            (None, MissingPolicy::Fold) => MISSING_LABEL,
            (None, MissingPolicy::Drop) => continue,
        };
        *counts.entry(label.to_string()).or_default() += 1;
    }

    counts
}

/// Turn counts into buckets sorted by count, highest first.
///
/// The sort is stable, so equal counts keep the map's insertion order.
pub fn rank(counts: IndexMap<String, usize>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(label, count)| Bucket { label, count })
        .collect();

    buckets.sort_by_key(|b| std::cmp::Reverse(b.count));
    buckets
}

/// Labels of the `n` most frequent non-absent values of `field`.
pub fn top_labels(records: &[&GraduateRecord], field: Field, n: usize) -> Vec<String> {
    rank(count_by(records, field, MissingPolicy::Drop))
        .into_iter()
        .take(n)
        .map(|b| b.label)
        .collect()
}

/// Group, rank and cut `field` according to `chart`.
pub fn top_buckets(records: &[&GraduateRecord], field: Field, chart: ChartConfig) -> Vec<Bucket> {
    let mut ranked = rank(count_by(records, field, chart.missing));

    match chart.missing {
        MissingPolicy::Drop => {
            ranked.truncate(chart.top_n);
            ranked
        }
        MissingPolicy::Fold => {
            let overflow: usize = ranked.iter().skip(chart.top_n).map(|b| b.count).sum();
            ranked.truncate(chart.top_n);
            if overflow > 0 {
                // A real "Otros" value in the top N absorbs the overflow.
                match ranked.iter_mut().find(|b| b.label == OTHERS_LABEL) {
                    Some(others) => others.count += overflow,
                    None => ranked.push(Bucket::new(OTHERS_LABEL, overflow)),
                }
            }
            ranked
        }
    }
}

/// Industries where graduates currently work.
pub fn industry_buckets(records: &[&GraduateRecord], chart: ChartConfig) -> Vec<Bucket> {
    top_buckets(records, Field::Industry, chart)
}

/// Employers with the most graduates.
pub fn company_buckets(records: &[&GraduateRecord], chart: ChartConfig) -> Vec<Bucket> {
    top_buckets(records, Field::Company, chart)
}

/// Most common job titles.
pub fn role_buckets(records: &[&GraduateRecord], chart: ChartConfig) -> Vec<Bucket> {
    top_buckets(records, Field::Role, chart)
}

/// Most common departments.
pub fn department_buckets(records: &[&GraduateRecord], chart: ChartConfig) -> Vec<Bucket> {
    top_buckets(records, Field::Department, chart)
}

/// Record count and first-year employment rate.
pub fn compute_kpis(records: &[&GraduateRecord]) -> Kpis {
    let total = records.len();
    let employed = records.iter().filter(|r| r.employed_first_year).count();

    let employment_rate = if total > 0 {
        (employed as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    Kpis {
        total,
        employment_rate,
    }
}

/// Records per program, most populated first.
pub fn career_counts(records: &[&GraduateRecord]) -> Vec<Bucket> {
    rank(count_by(records, Field::Career, MissingPolicy::Drop))
}
