//! # Catalog Loader
//!
//! Bulk import of the product catalog from delimited text.
//!
//! ## Input Format
//! ```text
//! codigo,nombre_producto,tipo_envase,destino,posibles_lineas_produccion
//! 4-03-0000-0019,JUGO NARANJA 1L,BOTELLA PET,NACIONAL,"Linea 1, Linea 2"
//! 4-03-0000-0020,JUGO MANZANA 1L,TETRA BRIK,EXPORTACION,Tetrapack
//! ```
//!
//! Rows whose code is already catalogued (or repeated earlier in the same
//! file) are skipped. The whole file is written in one transaction.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::catalog::insert_if_absent;
use linecheck_core::NewProduct;

/// Header columns the input must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "codigo",
    "nombre_producto",
    "tipo_envase",
    "destino",
    "posibles_lineas_produccion",
];

/// Catalog import failures.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Cannot read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog header is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Outcome of a catalog import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoadReport {
    pub inserted: usize,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "codigo")]
    code: String,
    #[serde(rename = "nombre_producto")]
    name: String,
    #[serde(rename = "tipo_envase")]
    container: String,
    #[serde(rename = "destino")]
    destination: String,
    #[serde(rename = "posibles_lineas_produccion")]
    production_lines: String,
}

impl From<CatalogRow> for NewProduct {
    fn from(row: CatalogRow) -> Self {
        NewProduct {
            code: row.code,
            name: row.name,
            container: row.container,
            destination: row.destination,
            production_lines: row.production_lines,
        }
    }
}

/// Parses catalog rows. Fails on the first malformed row.
fn parse_rows(input: impl Read) -> Result<Vec<NewProduct>, CatalogLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CatalogLoadError::MissingColumn(column));
        }
    }

    let mut products = Vec::new();
    for row in reader.deserialize::<CatalogRow>() {
        products.push(row?.into());
    }
    Ok(products)
}

/// Imports catalog rows from `input`.
///
/// ## Returns
/// * `Ok(report)` - Counts of inserted and skipped rows
/// * `Err(_)` - Nothing was written
pub async fn load_catalog(db: &Database, input: impl Read) -> Result<LoadReport, CatalogLoadError> {
    let products = parse_rows(input)?;

    let mut report = LoadReport::default();
    let mut tx = db
        .pool()
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    for product in &products {
        if product.code.is_empty() {
            warn!("Skipping catalog row without a code");
            report.skipped += 1;
            continue;
        }
        if insert_if_absent(&mut *tx, product).await? {
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }

    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Catalog loaded"
    );
    Ok(report)
}

/// Imports the catalog file at `path`.
pub async fn load_catalog_file(
    db: &Database,
    path: impl AsRef<Path>,
) -> Result<LoadReport, CatalogLoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading product catalog");
    let file = File::open(path)?;
    load_catalog(db, file).await
}
