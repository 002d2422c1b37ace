/*
 * Responsibility
 * - notes テーブル向け SQLx 操作
 * - 単一 note を扱う SQL は必ず id と owner の両方で絞り込む
 * - DB エラーは RepoError に変換して返す
 */
use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::repos::{
    error::{RepoError, RepoResult},
    note_store::{Note, NoteStore},
};

#[derive(Clone, Debug)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("DB migrations finished");
        Ok(())
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, owner: &str, title: &str, body: &str) -> RepoResult<Note> {
        let row = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (owner, title, body)
            VALUES ($1, $2, $3)
            RETURNING id, owner, title, body
            "#,
        )
        .bind(owner)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_for_owner(&self, id: i64, owner: &str) -> RepoResult<Note> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, owner, title, body
            FROM notes
            WHERE id = $1 AND owner = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn list_for_owner(&self, owner: &str) -> RepoResult<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, owner, title, body
            FROM notes
            WHERE owner = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, id: i64, owner: &str, title: &str, body: &str) -> RepoResult<Note> {
        sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET
                title = $3,
                body = $4,
                updated_at = now()
            WHERE id = $1 AND owner = $2
            RETURNING id, owner, title, body
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(title)
        .bind(body)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64, owner: &str) -> RepoResult<Note> {
        // RETURNING on DELETE yields the row as it was before removal.
        sqlx::query_as::<_, Note>(
            r#"
            DELETE FROM notes
            WHERE id = $1 AND owner = $2
            RETURNING id, owner, title, body
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)
    }
}
