//! Selection filtering.

use crate::models::{GraduateRecord, Selection};
use serde::{Deserialize, Serialize};

/// What an empty program selection means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptySelection {
    /// No program restriction.
    #[default]
    All,
    /// Nothing matches until a program is picked.
    None,
}

impl EmptySelection {
    pub fn from_flag(empty_means_all: bool) -> Self {
        if empty_means_all {
            EmptySelection::All
        } else {
            EmptySelection::None
        }
    }
}

/// Whether a single record passes the selection.
pub fn matches(record: &GraduateRecord, selection: &Selection, empty: EmptySelection) -> bool {
    let career_match = if selection.careers.is_empty() {
        empty == EmptySelection::All
    } else {
        selection.careers.contains(&record.career)
    };

    let company_match = match selection.company {
        None => true,
        Some(ref company) => record.company.as_deref() == Some(company.as_str()),
    };

    career_match && company_match
}

/// The subset of `records` passing `selection`, in original order.
pub fn filter_records<'a>(
    records: &'a [GraduateRecord],
    selection: &Selection,
    empty: EmptySelection,
) -> Vec<&'a GraduateRecord> {
    records
        .iter()
        .filter(|record| matches(record, selection, empty))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, career: &str, company: Option<&str>) -> GraduateRecord {
        GraduateRecord {
            id: id.to_string(),
            career: career.to_string(),
            employed_first_year: true,
            industry: None,
            company: company.map(String::from),
            department: None,
            role: None,
        }
    }

    fn sample() -> Vec<GraduateRecord> {
        vec![
            record("1", "Derecho", Some("Bci")),
            record("2", "Psicología", Some("Google")),
            record("3", "Derecho", None),
            record("4", "Periodismo", Some("bci")),
        ]
    }

    fn ids(filtered: &[&GraduateRecord]) -> Vec<String> {
        filtered.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_selection_means_all() {
        let records = sample();
        let filtered = filter_records(&records, &Selection::default(), EmptySelection::All);
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_empty_selection_means_none() {
        let records = sample();
        let filtered = filter_records(&records, &Selection::default(), EmptySelection::None);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_full_selection_returns_everything_under_both_policies() {
        let records = sample();
        let selection = Selection::with_careers(["Derecho", "Psicología", "Periodismo"]);
        for policy in [EmptySelection::All, EmptySelection::None] {
            assert_eq!(filter_records(&records, &selection, policy).len(), 4);
        }
    }

    #[test]
    fn test_career_filter() {
        let records = sample();
        let selection = Selection::with_careers(["Derecho"]);
        let filtered = filter_records(&records, &selection, EmptySelection::All);
        assert_eq!(ids(&filtered), vec!["1", "3"]);
    }

    #[test]
    fn test_company_filter_is_exact() {
        let records = sample();
        let selection = Selection {
            company: Some("Bci".to_string()),
            ..Default::default()
        };
        let filtered = filter_records(&records, &selection, EmptySelection::All);
        // "bci" differs in case and an absent company never matches.
        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let records = sample();
        let selection = Selection {
            careers: ["Psicología".to_string()].into_iter().collect(),
            company: Some("Bci".to_string()),
        };
        assert!(filter_records(&records, &selection, EmptySelection::All).is_empty());
    }
}
