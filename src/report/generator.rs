//! Markdown and JSON dashboard rendering.
//!
//! This module turns a derived [`Dashboard`] into the report the CLI
//! prints: KPI cards, one table per chart and the employer x department
//! matrix.

use crate::models::{Bucket, CrossTab, DataOrigin, Kpis, Report, ReportMetadata, Selection};
use anyhow::Result;

/// Status line shown while the single fetch is in flight.
pub const LOADING_MESSAGE: &str = "Cargando datos desde el backend...";

const FOOTER_NOTE: &str = "Indicadores calculados solo con trabajos actuales";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let dashboard = &report.dashboard;
    let mut output = String::new();

    output.push_str("# Pregrado Alumni\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_selection_section(&dashboard.selection));
    output.push_str(&generate_kpi_section(&dashboard.kpis));

    output.push_str(&generate_bucket_section(
        "Cargos más comunes entre nuestros egresados UAI",
        &dashboard.roles,
    ));
    output.push_str(&generate_bucket_section(
        "Rubros empresariales donde trabajan actualmente nuestros egresados UAI",
        &dashboard.industries,
    ));
    output.push_str(&generate_bucket_section(
        "Empresas con mayor número de empleados UAI",
        &dashboard.companies,
    ));
    output.push_str(&generate_bucket_section(
        "Departamentos más comunes entre nuestros egresados UAI",
        &dashboard.departments,
    ));

    output.push_str(&generate_matrix_section(&dashboard.matrix));
    output.push_str(&generate_footer());

    output
}

/// Generate the data source section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    let source = match metadata.origin {
        DataOrigin::Backend { ref url } => format!("Backend (`{}`)", url),
        DataOrigin::File { ref path } => format!("Archivo local (`{}`)", path),
        DataOrigin::Sample { .. } => "Datos de ejemplo generados".to_string(),
    };

    section.push_str(&format!("- **Fuente:** {}\n", source));
    section.push_str(&format!(
        "- **Registros cargados:** {}\n",
        format_thousands(metadata.records_loaded)
    ));
    section.push_str(&format!(
        "- **Generado:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if let Some(error) = metadata.origin.error() {
        section.push_str(&format!(
            "\n> **No se pudo conectar al backend:** {}\n",
            error
        ));
    }
    section.push('\n');

    section
}

/// Describe the active filters.
fn generate_selection_section(selection: &Selection) -> String {
    let mut section = String::new();

    section.push_str("## Filtros\n\n");
    if selection.careers.is_empty() {
        section.push_str("- **Carreras:** Todas las carreras de pregrado\n");
    } else {
        let careers: Vec<&str> = selection.careers.iter().map(String::as_str).collect();
        section.push_str(&format!("- **Carreras:** {}\n", careers.join(", ")));
    }
    if let Some(ref company) = selection.company {
        section.push_str(&format!("- **Empresa:** {}\n", company));
    }
    section.push('\n');

    section
}

/// Generate the KPI cards.
fn generate_kpi_section(kpis: &Kpis) -> String {
    let mut section = String::new();

    section.push_str("## Indicadores\n\n");
    section.push_str("| Índice de Empleabilidad al primer año | Total de estudiantes egresados |\n");
    section.push_str("|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{:.0}%** | **{}** |\n\n",
        kpis.employment_rate.round(),
        format_thousands(kpis.total)
    ));

    section
}

/// Generate one chart as a table with share percentages.
fn generate_bucket_section(title: &str, buckets: &[Bucket]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if buckets.is_empty() {
        section.push_str("*Sin datos para la selección actual.*\n\n");
        return section;
    }

    let total: usize = buckets.iter().map(|b| b.count).sum();

    section.push_str("| | Egresados | % |\n");
    section.push_str("|:---|---:|---:|\n");
    for bucket in buckets {
        let share = (bucket.count as f64 / total as f64) * 100.0;
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            bucket.label,
            format_thousands(bucket.count),
            share
        ));
    }
    section.push('\n');

    section
}

/// Generate the employer x department matrix with totals.
fn generate_matrix_section(matrix: &CrossTab) -> String {
    let mut section = String::new();

    section.push_str("## Matriz Empresa × Departamento (Egresados Únicos)\n\n");

    section.push_str("| Empresa \\ Depto |");
    for col in &matrix.cols {
        section.push_str(&format!(" {} |", col));
    }
    section.push_str(" Total |\n");

    section.push_str("|:---|");
    for _ in &matrix.cols {
        section.push_str(":---:|");
    }
    section.push_str(":---:|\n");

    for (r, row) in matrix.rows.iter().enumerate() {
        section.push_str(&format!("| **{}** |", row));
        for c in 0..matrix.cols.len() {
            section.push_str(&format!(" {} |", matrix.get(r, c)));
        }
        section.push_str(&format!(" **{}** |\n", matrix.row_total(r)));
    }

    section.push_str("| **Total por Depto** |");
    for c in 0..matrix.cols.len() {
        section.push_str(&format!(" **{}** |", matrix.col_total(c)));
    }
    section.push_str(&format!(" **{}** |\n\n", matrix.grand_total()));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!("*{}*\n", FOOTER_NOTE));
    footer.push_str("*UAI • Alumni Traceability Platform*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the program list: catalogue entries first, then extras found in the data.
pub fn generate_career_list(catalogue: &[&str], counts: &[Bucket]) -> String {
    let mut output = String::new();

    output.push_str("Carreras de pregrado:\n");
    for career in catalogue {
        let count = counts
            .iter()
            .find(|b| b.label == *career)
            .map(|b| b.count)
            .unwrap_or(0);
        output.push_str(&format!("  {:<40} {:>6}\n", career, format_thousands(count)));
    }

    let extras: Vec<&Bucket> = counts
        .iter()
        .filter(|b| !catalogue.contains(&b.label.as_str()))
        .collect();
    if !extras.is_empty() {
        output.push_str("\nOtras carreras en los datos:\n");
        for bucket in extras {
            output.push_str(&format!(
                "  {:<40} {:>6}\n",
                bucket.label,
                format_thousands(bucket.count)
            ));
        }
    }

    output
}

/// Group digits in thousands with '.' (es-CL style).
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dashboard, OTHER_COMPANIES_LABEL, OTHER_DEPARTMENTS_LABEL};
    use chrono::Utc;

    fn create_test_report(origin: DataOrigin) -> Report {
        Report {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                origin,
                records_loaded: 1200,
            },
            dashboard: Dashboard {
                selection: Selection::with_careers(["Derecho"]),
                kpis: Kpis {
                    total: 1200,
                    employment_rate: 87.6,
                },
                industries: vec![Bucket::new("Tecnología", 700), Bucket::new("Otros", 500)],
                companies: vec![Bucket::new("Bci", 3)],
                roles: vec![],
                departments: vec![Bucket::new("Finanzas", 2)],
                matrix: CrossTab {
                    rows: vec!["Bci".into(), OTHER_COMPANIES_LABEL.into()],
                    cols: vec!["Finanzas".into(), OTHER_DEPARTMENTS_LABEL.into()],
                    cells: vec![vec![2, 1], vec![0, 4]],
                },
            },
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(DataOrigin::Backend {
            url: "http://localhost:8000/analytics/graduates".into(),
        });
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Pregrado Alumni"));
        assert!(markdown.contains("| **88%** | **1.200** |"));
        assert!(markdown.contains("- **Carreras:** Derecho"));
        assert!(markdown.contains("| Tecnología | 700 | 58.3% |"));
        assert!(markdown.contains("*Sin datos para la selección actual.*"));
        assert!(markdown.contains(FOOTER_NOTE));
        assert!(!markdown.contains("No se pudo conectar"));
    }

    #[test]
    fn test_kpi_rate_rounds_half_up() {
        let section = generate_kpi_section(&Kpis {
            total: 8,
            employment_rate: 62.5,
        });
        assert!(section.contains("| **63%** | **8** |"));
    }

    #[test]
    fn test_fallback_error_is_shown() {
        let report = create_test_report(DataOrigin::Sample {
            error: "Error 500 al cargar datos".into(),
        });
        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("**No se pudo conectar al backend:** Error 500 al cargar datos"));
    }

    #[test]
    fn test_generate_matrix_section() {
        let report = create_test_report(DataOrigin::File {
            path: "graduates.json".into(),
        });
        let section = generate_matrix_section(&report.dashboard.matrix);

        assert!(section.contains("| **Bci** | 2 | 1 | **3** |"));
        assert!(section.contains("| **Otras empresas** | 0 | 4 | **4** |"));
        assert!(section.contains("| **Total por Depto** | **2** | **5** | **7** |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(DataOrigin::Sample {
            error: "boom".into(),
        });
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"kind\": \"sample\""));
        assert!(json.contains("\"employment_rate\""));
        assert!(json.contains("\"matrix\""));
    }

    #[test]
    fn test_generate_career_list() {
        let counts = vec![Bucket::new("Derecho", 12), Bucket::new("Sin dato", 2)];
        let list = generate_career_list(&["Psicología", "Derecho"], &counts);

        assert!(list.contains("Psicología"));
        assert!(list.contains("Otras carreras en los datos:"));
        assert!(list.contains("Sin dato"));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1.000");
        assert_eq!(format_thousands(1234567), "1.234.567");
    }
}
