//! Employer x department cross-tabulation.

use crate::analysis::aggregator::{top_labels, Field};
use crate::config::MatrixConfig;
use crate::models::{CrossTab, GraduateRecord, OTHER_COMPANIES_LABEL, OTHER_DEPARTMENTS_LABEL};

/// Build the employer x department matrix over `records`.
///
/// Rows are the top employers plus "Otras empresas", columns the top
/// departments plus "Otros departamentos". Both axes are ranked
/// independently. Records lacking either field are left out entirely.
pub fn build_crosstab(records: &[&GraduateRecord], matrix: MatrixConfig) -> CrossTab {
    let top_companies = top_labels(records, Field::Company, matrix.top_rows);
    let top_departments = top_labels(records, Field::Department, matrix.top_cols);

    let (rows, other_row) = with_catch_all(top_companies, OTHER_COMPANIES_LABEL);
    let (cols, other_col) = with_catch_all(top_departments, OTHER_DEPARTMENTS_LABEL);

    let mut cells = vec![vec![0usize; cols.len()]; rows.len()];

    for record in records {
        let (Some(company), Some(department)) =
            (record.company.as_deref(), record.department.as_deref())
        else {
            continue;
        };

        let row = position(&rows, company).unwrap_or(other_row);
        let col = position(&cols, department).unwrap_or(other_col);
        cells[row][col] += 1;
    }

    CrossTab { rows, cols, cells }
}

/// Append the catch-all label unless a real value already carries it.
/// Returns the labels and the catch-all's index.
fn with_catch_all(mut labels: Vec<String>, catch_all: &str) -> (Vec<String>, usize) {
    match position(&labels, catch_all) {
        Some(index) => (labels, index),
        None => {
            labels.push(catch_all.to_string());
            let index = labels.len() - 1;
            (labels, index)
        }
    }
}

fn position(labels: &[String], value: &str) -> Option<usize> {
    labels.iter().position(|l| l == value)
}
