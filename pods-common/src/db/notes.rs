//! SQLite-backed note store

use crate::notes::{DocumentNode, NoteCustom, NoteStore, WriteOptions};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Note store persisting to the `notes` table
#[derive(Debug, Clone)]
pub struct SqliteNoteStore {
    pool: SqlitePool,
}

impl SqliteNoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const INSERT_NOTE: &str = r#"
    INSERT INTO notes (id, vault, fname, title, body, custom, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_NOTE: &str = r#"
    INSERT INTO notes (id, vault, fname, title, body, custom, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(vault, fname) DO UPDATE SET
        title = excluded.title,
        body = excluded.body,
        custom = excluded.custom,
        updated_at = excluded.updated_at
"#;

/// Column values for one node, prepared before touching the database
struct NoteParams {
    id: String,
    vault: String,
    fname: String,
    title: String,
    body: String,
    custom: String,
    created_at: String,
    updated_at: String,
}

impl NoteParams {
    fn from_node(node: &DocumentNode, updated: DateTime<Utc>) -> Result<Self> {
        let custom = serde_json::to_string(&node.custom)
            .map_err(|e| Error::Internal(format!("Failed to serialize custom metadata: {}", e)))?;

        Ok(Self {
            id: node.id.to_string(),
            vault: node.vault.clone(),
            fname: node.fname.clone(),
            title: node.title.clone(),
            body: node.body.clone(),
            custom,
            created_at: node.created.to_rfc3339(),
            updated_at: updated.to_rfc3339(),
        })
    }

    fn bind<'q>(
        &'q self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        query
            .bind(&self.id)
            .bind(&self.vault)
            .bind(&self.fname)
            .bind(&self.title)
            .bind(&self.body)
            .bind(&self.custom)
            .bind(&self.created_at)
            .bind(&self.updated_at)
    }
}

/// Map a unique-constraint failure to `AlreadyExists`
fn map_insert_error(err: sqlx::Error, node: &DocumentNode) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::AlreadyExists(format!("{} in vault {}", node.fname, node.vault))
        }
        _ => Error::Database(err),
    }
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}

fn node_from_row(row: &SqliteRow) -> Result<DocumentNode> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Failed to parse note id: {}", e)))?;

    let custom: String = row.get("custom");
    let custom: NoteCustom = serde_json::from_str(&custom)
        .map_err(|e| Error::Internal(format!("Failed to deserialize custom metadata: {}", e)))?;

    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(DocumentNode {
        id,
        fname: row.get("fname"),
        vault: row.get("vault"),
        title: row.get("title"),
        body: row.get("body"),
        custom,
        created: parse_timestamp(&created_at, "created_at")?,
        updated: parse_timestamp(&updated_at, "updated_at")?,
    })
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn lookup_by_name(&self, fname: &str, vault: &str) -> Result<Option<DocumentNode>> {
        let row = sqlx::query(
            r#"
            SELECT id, vault, fname, title, body, custom, created_at, updated_at
            FROM notes
            WHERE vault = ? AND fname = ?
            "#,
        )
        .bind(vault)
        .bind(fname)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(node_from_row).transpose()
    }

    async fn create(&self, node: &DocumentNode) -> Result<()> {
        let params = NoteParams::from_node(node, node.updated)?;
        params
            .bind(sqlx::query(INSERT_NOTE))
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, node))?;
        Ok(())
    }

    async fn bulk_create(&self, nodes: &[DocumentNode]) -> Result<()> {
        let params = nodes
            .iter()
            .map(|n| NoteParams::from_node(n, n.updated))
            .collect::<Result<Vec<_>>>()?;

        // Dropping the transaction on error rolls the whole batch back
        let mut tx = self.pool.begin().await?;
        for (node, p) in nodes.iter().zip(&params) {
            p.bind(sqlx::query(INSERT_NOTE))
                .execute(&mut *tx)
                .await
                .map_err(|e| map_insert_error(e, node))?;
        }
        tx.commit().await?;

        tracing::debug!(count = nodes.len(), "Bulk-created notes");
        Ok(())
    }

    async fn update(&self, node: &DocumentNode, opts: WriteOptions) -> Result<()> {
        if !opts.update_existing {
            return self.create(node).await;
        }

        let params = NoteParams::from_node(node, Utc::now())?;
        params
            .bind(sqlx::query(UPSERT_NOTE))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, vault: &str) -> Result<Vec<DocumentNode>> {
        let rows = sqlx::query(
            r#"
            SELECT id, vault, fname, title, body, custom, created_at, updated_at
            FROM notes
            WHERE vault = ?
            ORDER BY fname
            "#,
        )
        .bind(vault)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(node_from_row).collect()
    }
}
