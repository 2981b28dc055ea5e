//! Sample dataset used when the backend cannot be reached.
//!
//! The catalogues mirror the programs and labour-market labels the
//! university tracks, so a fallback dashboard still looks plausible.

use crate::models::GraduateRecord;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

/// Undergraduate programs, in sidebar order.
pub const CAREERS: [&str; 11] = [
    "Psicología",
    "Periodismo",
    "Derecho",
    "Ingeniería Comercial",
    "Ingeniería en Diseño",
    "Ingeniería Civil Industrial",
    "Ingeniería Civil Informática",
    "Ingeniería Civil en Bioingeniería",
    "Ingeniería Civil en Energía",
    "Ingeniería Civil Mecánica",
    "Ingeniería Civil en Minería",
];

const INDUSTRIES: [&str; 8] = [
    "Tecnología",
    "Banca y Finanzas",
    "Consumo Masivo",
    "Minería",
    "Consultoría",
    "Retail",
    "Educación",
    "Salud",
];

const COMPANIES: [&str; 10] = [
    "Google",
    "Bci",
    "Latam Airlines",
    "Falabella",
    "Walmart",
    "Codelco",
    "Accenture",
    "Amazon",
    "Enel",
    "Scotiabank",
];

const ROLES: [&str; 8] = [
    "Analista",
    "Consultor",
    "Ingeniero de Software",
    "Jefe de Proyectos",
    "Gerente de Área",
    "Director",
    "Fundador",
    "Socio",
];

const DEPARTMENTS: [&str; 11] = [
    "Marketing",
    "Comercial",
    "Finanzas",
    "Operaciones",
    "Tecnología",
    "Recursos Humanos",
    "Estrategia y Dirección",
    "Legal y Compliance",
    "Innovación y Emprendimiento",
    "Sector Público",
    "Educación / Academia",
];

/// Share of generated graduates without labour data.
const MISSING_DATA_RATE: f64 = 0.10;

/// Share of generated graduates employed within the first year.
const EMPLOYMENT_RATE: f64 = 0.88;

/// Generate `count` plausible records. A fixed `seed` makes the output reproducible.
pub fn generate_sample(count: usize, seed: Option<u64>) -> Vec<GraduateRecord> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!("Generating {} sample records (seed: {:?})", count, seed);

    (0..count)
        .map(|i| {
            let has_data = !rng.gen_bool(MISSING_DATA_RATE);
            let mut pick = |options: &[&str]| -> Option<String> {
                if has_data {
                    options.choose(&mut rng).map(|s| s.to_string())
                } else {
                    None
                }
            };

            let industry = pick(&INDUSTRIES[..]);
            let company = pick(&COMPANIES[..]);
            let department = pick(&DEPARTMENTS[..]);
            let role = pick(&ROLES[..]);

            GraduateRecord {
                id: format!("ALU-{}", i),
                career: CAREERS[rng.gen_range(0..CAREERS.len())].to_string(),
                employed_first_year: rng.gen_bool(EMPLOYMENT_RATE),
                industry,
                company,
                department,
                role,
            }
        })
        .collect()
}
