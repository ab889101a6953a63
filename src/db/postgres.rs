use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use crate::{
    db::{PatchOutcome, TitleStore, VersionedTitle},
    error::{AppError, AppResult},
    models::{CatalogId, Title, TitleKind, TitlePatch},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Runs the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Title documents stored as JSONB rows with a version column
///
/// A patch locks the row, checks the version, rewrites the document and bumps
/// the version inside one transaction.
#[derive(Clone)]
pub struct PgTitleStore {
    pool: PgPool,
}

impl PgTitleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TitleStore for PgTitleStore {
    async fn insert(&self, title: &Title) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO titles (catalog_id, media_type, document, version, created_at, updated_at)
            VALUES ($1, $2, $3, 1, $4, $5)
            ON CONFLICT (catalog_id) DO NOTHING
            "#,
        )
        .bind(title.id.as_str())
        .bind(title.kind().as_str())
        .bind(Json(title))
        .bind(title.created_at)
        .bind(title.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Duplicate(format!(
                "Title {} already exists in the catalog",
                title.id
            )));
        }

        tracing::debug!(title_id = %title.id, "Inserted title document");
        Ok(())
    }

    async fn load(&self, id: &CatalogId) -> AppResult<Option<VersionedTitle>> {
        let row: Option<(Json<Title>, i64)> =
            sqlx::query_as("SELECT document, version FROM titles WHERE catalog_id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(Json(title), version)| VersionedTitle { title, version }))
    }

    async fn list(&self, kind: Option<TitleKind>) -> AppResult<Vec<Title>> {
        let rows: Vec<(Json<Title>,)> = sqlx::query_as(
            r#"
            SELECT document
            FROM titles
            WHERE $1::text IS NULL OR media_type = $1
            ORDER BY created_at, catalog_id
            "#,
        )
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(title),)| title).collect())
    }

    async fn apply_patch(
        &self,
        id: &CatalogId,
        expected_version: i64,
        patch: &TitlePatch,
    ) -> AppResult<PatchOutcome> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Json<Title>, i64)> = sqlx::query_as(
            "SELECT document, version FROM titles WHERE catalog_id = $1 FOR UPDATE",
        )
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((Json(mut title), version)) = row else {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Title {} not found", id)));
        };

        if version != expected_version {
            tx.rollback().await?;
            tracing::debug!(
                title_id = %id,
                expected_version,
                found_version = version,
                "Version mismatch on patch"
            );
            return Ok(PatchOutcome::Conflict);
        }

        title.apply(patch);

        sqlx::query(
            r#"
            UPDATE titles
            SET document = $2, version = version + 1, updated_at = $3
            WHERE catalog_id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(Json(&title))
        .bind(title.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PatchOutcome::Applied {
            version: version + 1,
        })
    }
}
