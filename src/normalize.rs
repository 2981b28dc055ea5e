//! Raw row normalization.
//!
//! Upstream data is inconsistently populated, so every field is coerced
//! instead of validated: blanks and sentinel strings become `None`.

use crate::models::{GraduateRecord, RawGraduate, NO_DATA_LABEL};

/// Sentinels meaning "value not collected", compared case-insensitively.
const SENTINELS: [&str; 2] = ["sin dato", "sin información"];

/// Trim `value`; blank or sentinel text becomes `None`.
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if SENTINELS.contains(&lower.as_str()) {
        return None;
    }

    Some(trimmed.to_string())
}

/// Map one raw row (at position `index`) into a [`GraduateRecord`].
pub fn normalize_row(row: &RawGraduate, index: usize) -> GraduateRecord {
    let id = if row.rut.is_empty() {
        format!("ALU-{}", index)
    } else {
        row.rut.clone()
    };

    GraduateRecord {
        id,
        career: optional_text(&row.career).unwrap_or_else(|| NO_DATA_LABEL.to_string()),
        employed_first_year: row.work_current,
        industry: optional_text(&row.industry),
        company: optional_text(&row.company),
        department: optional_text(&row.department),
        role: optional_text(&row.role),
    }
}

/// Normalize a whole payload, keeping positional ids stable.
pub fn normalize_rows(rows: &[RawGraduate]) -> Vec<GraduateRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize_row(row, index))
        .collect()
}
