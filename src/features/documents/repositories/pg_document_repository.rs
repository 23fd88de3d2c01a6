use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::DocumentRepository;
use crate::core::database::unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::documents::models::{DocumentRecord, Visibility};

/// Postgres-backed document metadata
pub struct PgDocumentRepository {
    pool: PgPool,
    case_sensitive_search: bool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool, case_sensitive_search: bool) -> Self {
        Self {
            pool,
            case_sensitive_search,
        }
    }
}

/// Escape LIKE wildcards so the needle matches literally
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn create(&self, record: &DocumentRecord) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO documents (id, display_name, extension, visibility, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(record.id)
        .bind(&record.display_name)
        .bind(&record.extension)
        .bind(record.visibility)
        .bind(record.owner_id)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AppError::DuplicateName(format!(
                "A document named '{}' already exists",
                record.display_name
            )),
            None => {
                tracing::error!("Failed to insert document: {:?}", e);
                AppError::Database(e)
            }
        })?;

        debug!("Document record inserted: id={}", id);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, display_name, extension, visibility, owner_id, created_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_display_name_contains(&self, needle: &str) -> Result<Vec<DocumentRecord>> {
        let sql = if self.case_sensitive_search {
            r#"
            SELECT id, display_name, extension, visibility, owner_id, created_at
            FROM documents
            WHERE display_name LIKE $1 ESCAPE '\'
            ORDER BY created_at DESC
            "#
        } else {
            r#"
            SELECT id, display_name, extension, visibility, owner_id, created_at
            FROM documents
            WHERE display_name ILIKE $1 ESCAPE '\'
            ORDER BY created_at DESC
            "#
        };

        let records = sqlx::query_as::<_, DocumentRecord>(sql)
            .bind(like_pattern(needle))
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn find_all_by_visibility(&self, visibility: Visibility) -> Result<Vec<DocumentRecord>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, display_name, extension, visibility, owner_id, created_at
            FROM documents
            WHERE visibility = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(visibility)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_all(&self) -> Result<Vec<DocumentRecord>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, display_name, extension, visibility, owner_id, created_at
            FROM documents
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Document {} not found", id)));
        }

        Ok(())
    }
}
