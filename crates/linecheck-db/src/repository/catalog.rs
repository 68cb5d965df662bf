//! # Catalog Repository
//!
//! Read access to the product catalog, plus the insert used by the bulk
//! loader.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::query::contains_pattern;
use linecheck_core::validation::suggest_term;
use linecheck_core::{NewProduct, Product, SUGGEST_LIMIT};

const COLUMNS: &str = "id, code, name, container, destination, production_lines";

/// Repository for product catalog lookups.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Exact lookup by catalog code.
    ///
    /// ## Returns
    /// * `Ok(Some(product))` - Product found
    /// * `Ok(None)` - Code not in the catalog
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE code = ?"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Catalog codes containing `term`, case-insensitively.
    ///
    /// Terms shorter than two characters return nothing without querying.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let codes = db.catalog().search_codes("0019").await?;
    /// // ["4-03-0000-0019", "4-03-0001-0019"]
    /// ```
    pub async fn search_codes(&self, term: &str) -> DbResult<Vec<String>> {
        let Some(term) = suggest_term(term) else {
            return Ok(Vec::new());
        };

        debug!(term = %term, "Searching catalog codes");

        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT code FROM products WHERE code LIKE ? ESCAPE '\\' ORDER BY code LIMIT ?",
        )
        .bind(contains_pattern(term))
        .bind(i64::from(SUGGEST_LIMIT))
        .fetch_all(&self.pool)
        .await?;

        Ok(codes)
    }

    /// Inserts `product` unless its code is already catalogued.
    ///
    /// ## Returns
    /// * `Ok(true)` - Inserted
    /// * `Ok(false)` - Code already present; nothing changed
    pub async fn insert_if_absent(&self, product: &NewProduct) -> DbResult<bool> {
        insert_if_absent(&self.pool, product).await
    }

    /// Number of catalogued products.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Shared with the bulk loader, which runs it inside its transaction.
pub(crate) async fn insert_if_absent<'e, E>(executor: E, product: &NewProduct) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO products (code, name, container, destination, production_lines) \
         VALUES (?, ?, ?, ?, ?) ON CONFLICT (code) DO NOTHING",
    )
    .bind(&product.code)
    .bind(&product.name)
    .bind(&product.container)
    .bind(&product.destination)
    .bind(&product.production_lines)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn product(code: &str, lines: &str) -> NewProduct {
        NewProduct {
            code: code.to_string(),
            name: "JUGO NARANJA 1L".to_string(),
            container: "BOTELLA PET".to_string(),
            destination: "NACIONAL".to_string(),
            production_lines: lines.to_string(),
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for code in ["4-03-0000-0019", "4-03-0000-0020", "4-03-0001-0015", "5-10-0000-0001"] {
            db.catalog()
                .insert_if_absent(&product(code, "Linea 1, Linea 2"))
                .await
                .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_get_by_code() {
        let db = seeded().await;

        let found = db.catalog().get_by_code("4-03-0000-0019").await.unwrap().unwrap();
        assert_eq!(found.lines(), vec!["Linea 1", "Linea 2"]);
        assert_eq!(db.catalog().get_by_code("4-03").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_if_absent_skips_existing() {
        let db = seeded().await;

        let inserted = db
            .catalog()
            .insert_if_absent(&product("4-03-0000-0019", "Tetrapack"))
            .await
            .unwrap();

        assert!(!inserted);
        assert_eq!(db.catalog().count().await.unwrap(), 4);
        let kept = db.catalog().get_by_code("4-03-0000-0019").await.unwrap().unwrap();
        assert_eq!(kept.production_lines, "Linea 1, Linea 2");
    }

    #[tokio::test]
    async fn test_search_codes() {
        let db = seeded().await;

        assert_eq!(
            db.catalog().search_codes("4-03-0000").await.unwrap(),
            vec!["4-03-0000-0019", "4-03-0000-0020"]
        );
        assert!(db.catalog().search_codes("4").await.unwrap().is_empty());
        assert!(db.catalog().search_codes("9-9").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_codes_caps_results() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for i in 0..15 {
            db.catalog()
                .insert_if_absent(&product(&format!("7-00-0000-{i:04}"), ""))
                .await
                .unwrap();
        }

        let codes = db.catalog().search_codes("7-00").await.unwrap();
        assert_eq!(codes.len(), SUGGEST_LIMIT as usize);
    }
}
