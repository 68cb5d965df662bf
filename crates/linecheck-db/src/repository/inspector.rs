//! # Inspector Repository
//!
//! Registry of inspector names offered on the inspection form.
//!
//! Summary records copy the inspector's name at save time, so removing an
//! inspector here never changes history.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use linecheck_core::validation::validate_inspector_name;
use linecheck_core::{Inspector, ValidationError};

/// Repository for inspector operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.inspectors();
///
/// let ana = repo.create("Ana López").await?;
/// let names = repo.list_names().await?;
/// repo.delete(ana.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InspectorRepository {
    pool: SqlitePool,
}

impl InspectorRepository {
    /// Creates a new InspectorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InspectorRepository { pool }
    }

    /// All inspectors, in registration order.
    pub async fn list(&self) -> DbResult<Vec<Inspector>> {
        let inspectors =
            sqlx::query_as::<_, Inspector>("SELECT id, name FROM inspectors ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(inspectors)
    }

    /// Inspector names only, in registration order.
    pub async fn list_names(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM inspectors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Inspector>> {
        let inspector = sqlx::query_as::<_, Inspector>("SELECT id, name FROM inspectors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(inspector)
    }

    /// Exact, case-sensitive lookup.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Inspector>> {
        let inspector =
            sqlx::query_as::<_, Inspector>("SELECT id, name FROM inspectors WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(inspector)
    }

    /// Registers a new inspector.
    ///
    /// ## Returns
    /// * `Ok(inspector)` - Registered, with its assigned id
    /// * `Err(DbError::Validation(_))` - Name length out of bounds, or the
    ///   name is already registered
    pub async fn create(&self, name: &str) -> DbResult<Inspector> {
        validate_inspector_name(name)?;

        if self.get_by_name(name).await?.is_some() {
            return Err(ValidationError::duplicate("inspector", name).into());
        }

        let inspector = sqlx::query_as::<_, Inspector>(
            "INSERT INTO inspectors (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            // Lost a race with another writer registering the same name
            DbError::UniqueViolation { .. } => ValidationError::duplicate("inspector", name).into(),
            other => other,
        })?;

        info!(id = inspector.id, name = %inspector.name, "Inspector registered");
        Ok(inspector)
    }

    /// Removes an inspector and returns what was removed.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No inspector with this id
    pub async fn delete(&self, id: i64) -> DbResult<Inspector> {
        let removed = sqlx::query_as::<_, Inspector>(
            "DELETE FROM inspectors WHERE id = ? RETURNING id, name",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Inspector", id))?;

        debug!(id, name = %removed.name, "Inspector removed");
        Ok(removed)
    }
}
