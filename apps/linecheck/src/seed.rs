//! # Demo Data Generator
//!
//! Populates an empty database with a small catalog, a few inspectors and
//! a spread of inspection records for trying out the history commands.
//!
//! ## Usage
//! ```bash
//! linecheck --db ./demo.db seed-demo --count 500
//! ```
//!
//! Values are derived from the record index, so every run on an empty
//! database produces the same rows (timestamps aside).

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use linecheck_core::{NewDetailRecord, NewProduct, NewSummaryRecord, PLACEHOLDER};
use linecheck_db::{Database, DbResult};

/// Catalog entries: code, name, container, destination, eligible lines
const PRODUCTS: &[(&str, &str, &str, &str, &str)] = &[
    ("4-03-0000-0019", "JUGO NARANJA 1L", "BOTELLA PET", "NACIONAL", "Linea 1, Linea 2"),
    ("4-03-0000-0020", "JUGO MANZANA 1L", "BOTELLA PET", "NACIONAL", "Linea 1"),
    ("4-03-0001-0015", "NECTAR DURAZNO 200ML", "TETRA BRIK", "EXPORTACION", "Tetrapack"),
    ("5-10-0000-0001", "AGUA MINERAL 500ML", "BOTELLA PET", "NACIONAL", "Linea 2"),
    ("5-10-0000-0002", "AGUA SABORIZADA 1.5L", "BOTELLA PET", "EXPORTACION", "Linea 2, Linea 3"),
];

const INSPECTORS: &[&str] = &["Juan Pérez", "María García", "Ana López"];

/// Defect types and their descriptions
const DEFECTS: &[(&str, &[&str])] = &[
    ("LLENADO", &["Nivel de llenado bajo", "Nivel de llenado alto"]),
    ("CAPSULADO", &["Tapa floja", "Tapa torcida"]),
    ("ETIQUETADO", &["Etiqueta despegada", "Etiqueta corrida", "Sin fecha"]),
    ("SELLADO", &["Sello incompleto"]),
];

const HOURS: &[&str] = &["06:00", "07:00", "08:00", "09:00", "10:00", "11:00", "12:00", "13:00"];

/// What the generator wrote.
#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub products: usize,
    pub inspectors: usize,
    pub summaries: usize,
    pub details: usize,
    /// Set when the database already held records and nothing was written.
    pub skipped: bool,
}

/// Generates `count` summary records plus their hourly details.
///
/// Does nothing when summary records already exist.
pub async fn seed_demo(db: &Database, count: usize) -> DbResult<SeedReport> {
    let existing = db.summaries().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has summary records, skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut report = SeedReport::default();

    for (code, name, container, destination, lines) in PRODUCTS {
        let product = NewProduct {
            code: code.to_string(),
            name: name.to_string(),
            container: container.to_string(),
            destination: destination.to_string(),
            production_lines: lines.to_string(),
        };
        if db.catalog().insert_if_absent(&product).await? {
            report.products += 1;
        }
    }

    for name in INSPECTORS {
        if db.inspectors().get_by_name(name).await?.is_none() {
            db.inspectors().create(name).await?;
            report.inspectors += 1;
        }
    }

    // Spread records over the last 30 days
    let start = Utc::now() - Duration::days(30);
    let step_minutes = (30 * 24 * 60 / count.max(1)) as i64;

    let mut details = Vec::new();
    for i in 0..count {
        let (code, name, container, destination, lines) = PRODUCTS[i % PRODUCTS.len()];
        let eligible: Vec<&str> = lines.split(',').map(str::trim).collect();
        let line = eligible[(i / PRODUCTS.len()) % eligible.len()];
        let (defect_type, descriptions) = DEFECTS[(i / 2) % DEFECTS.len()];

        let hours_with_defects = i % 4;
        let counts: Vec<i64> = (0..hours_with_defects).map(|h| ((i + h) % 5 + 1) as i64).collect();

        let record = NewSummaryRecord {
            code: code.to_string(),
            inspector: INSPECTORS[i % INSPECTORS.len()].to_string(),
            lot: format!("{}", 100 + i / 6),
            product_name: name.to_string(),
            container: container.to_string(),
            destination: destination.to_string(),
            production_line: line.to_string(),
            defect_type: defect_type.to_string(),
            defect_total: counts.iter().sum(),
            observation: if i % 9 == 0 {
                "Revisar calibración de llenadora".to_string()
            } else {
                PLACEHOLDER.to_string()
            },
        };

        let at = start + Duration::minutes(step_minutes * i as i64);
        let saved = db.summaries().insert_at(&record, at).await?;
        report.summaries += 1;

        for (h, defect_count) in counts.into_iter().enumerate() {
            details.push(NewDetailRecord {
                summary_id: saved.id,
                date: at.date_naive(),
                hour: HOURS[(i + h) % HOURS.len()].to_string(),
                description: descriptions[(i + h) % descriptions.len()].to_string(),
                defect_count,
            });
        }

        if report.summaries % 100 == 0 {
            info!(generated = report.summaries, "Generating summary records");
        }
    }

    report.details = db.details().insert_batch(&details).await?.len();

    info!(
        products = report.products,
        inspectors = report.inspectors,
        summaries = report.summaries,
        details = report.details,
        "Demo data generated"
    );
    Ok(report)
}
