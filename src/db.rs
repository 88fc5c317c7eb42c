use chrono::{DateTime, Utc};
#[cfg(feature = "postgres")]
use sqlx::any::AnyKind;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::{info, warn};

use crate::keys::generate_url_id;
use crate::models::Paste;
use crate::{AppError, AppResult};

/// How many fresh url ids an insert may try before giving up.
pub const MAX_KEY_ATTEMPTS: u32 = 5;

const SQLITE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS paste (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    owner_label TEXT NOT NULL,
    url_id TEXT NOT NULL UNIQUE,
    password_hash TEXT,
    created_at TEXT NOT NULL,
    expires_at TEXT
)";

#[cfg(feature = "postgres")]
const POSTGRES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS paste (
    id BIGSERIAL PRIMARY KEY,
    content TEXT NOT NULL,
    owner_label TEXT NOT NULL,
    url_id TEXT NOT NULL UNIQUE,
    password_hash TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    expires_at TIMESTAMPTZ
)";

const PASTE_COLUMNS: &str =
    "id, content, owner_label, url_id, password_hash, created_at, expires_at";

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connect to a database by URL.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the paste table if it does not exist yet. Existing rows are untouched.
    pub async fn initialize(&self) -> AppResult<()> {
        let schema = match self.pool.any_kind() {
            #[cfg(feature = "postgres")]
            AnyKind::Postgres => POSTGRES_SCHEMA,
            #[allow(unreachable_patterns)]
            _ => SQLITE_SCHEMA,
        };

        let mut conn = self.pool.acquire().await?;
        sqlx::query(schema).execute(&mut conn).await?;
        info!("database initialized");
        Ok(())
    }

    /// Get a paste by its public url id.
    pub async fn get_paste(&self, url_id: &str) -> AppResult<Option<Paste>> {
        let mut conn = self.pool.acquire().await?;
        let paste = sqlx::query_as::<_, Paste>(&format!(
            "SELECT {PASTE_COLUMNS} FROM paste WHERE url_id = $1"
        ))
        .bind(url_id)
        .fetch_optional(&mut conn)
        .await?;
        Ok(paste)
    }

    /// Insert a paste under a freshly generated url id.
    pub async fn insert_paste(
        &self,
        content: &str,
        owner_label: &str,
        password_hash: Option<&str>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Paste> {
        self.insert_paste_with(
            generate_url_id,
            content,
            owner_label,
            password_hash,
            created_at,
            expires_at,
        )
        .await
    }

    /// Insert a paste, drawing url ids from `next_key` until one is free or
    /// [`MAX_KEY_ATTEMPTS`] have collided.
    pub async fn insert_paste_with(
        &self,
        mut next_key: impl FnMut() -> String,
        content: &str,
        owner_label: &str,
        password_hash: Option<&str>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Paste> {
        let sql = format!(
            "INSERT INTO paste (content, owner_label, url_id, password_hash, created_at, \
             expires_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PASTE_COLUMNS}"
        );

        for attempt in 1..=MAX_KEY_ATTEMPTS {
            let url_id = next_key();
            let mut conn = self.pool.acquire().await?;
            let result = sqlx::query_as::<_, Paste>(&sql)
                .bind(content)
                .bind(owner_label)
                .bind(&url_id)
                .bind(password_hash)
                .bind(created_at)
                .bind(expires_at)
                .fetch_one(&mut conn)
                .await;

            match result {
                Ok(paste) => return Ok(paste),
                Err(err) if is_unique_violation(&err) => {
                    warn!("url id collision on attempt {attempt}: '{url_id}'");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::KeysExhausted {
            attempts: MAX_KEY_ATTEMPTS,
        })
    }
}

/// SQLite reports `SQLITE_CONSTRAINT_UNIQUE` (2067) or `SQLITE_CONSTRAINT_PRIMARYKEY` (1555),
/// PostgreSQL reports `unique_violation` (23505).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.code().as_deref(), Some("2067" | "1555" | "23505"))
                || db_err.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    async fn memory_db() -> Database {
        let db = Database::connect("sqlite::memory:", 1).await.unwrap();
        db.initialize().await.unwrap();
        db
    }

    #[tokio::test]
    async fn insert_then_fetch() {
        let db = memory_db().await;
        let now = Utc::now();
        let expires = now + Duration::minutes(5);

        let inserted = db
            .insert_paste("Hello, world!", "user123", Some("$2b$hash"), now, Some(expires))
            .await
            .unwrap();
        let fetched = db.get_paste(&inserted.url_id).await.unwrap().unwrap();

        assert_eq!(fetched.id, inserted.id);
        assert_eq!(fetched.content, "Hello, world!");
        assert_eq!(fetched.owner_label, "user123");
        assert_eq!(fetched.password_hash.as_deref(), Some("$2b$hash"));
        assert_eq!(fetched.created_at, now);
        assert_eq!(fetched.expires_at, Some(expires));
    }

    #[tokio::test]
    async fn missing_paste_is_none() {
        let db = memory_db().await;
        assert!(db.get_paste("nonexistent-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_increase() {
        let db = memory_db().await;
        let now = Utc::now();
        let a = db.insert_paste("a", "u", None, now, None).await.unwrap();
        let b = db.insert_paste("b", "u", None, now, None).await.unwrap();
        assert!(b.id > a.id);
        assert_ne!(a.url_id, b.url_id);
    }

    #[tokio::test]
    async fn initialize_twice_keeps_rows() {
        let db = memory_db().await;
        let paste = db
            .insert_paste("keep me", "u", None, Utc::now(), None)
            .await
            .unwrap();

        db.initialize().await.unwrap();

        let fetched = db.get_paste(&paste.url_id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "keep me");
    }

    #[tokio::test]
    async fn collision_retries_with_new_key() {
        let db = memory_db().await;
        let now = Utc::now();
        db.insert_paste_with(|| "AAAAAAAA".to_owned(), "first", "u", None, now, None)
            .await
            .unwrap();

        let mut keys = vec!["BBBBBBBB", "AAAAAAAA", "AAAAAAAA"];
        let paste = db
            .insert_paste_with(
                move || keys.pop().unwrap().to_owned(),
                "second",
                "u",
                None,
                now,
                None,
            )
            .await
            .unwrap();

        assert_eq!(paste.url_id, "BBBBBBBB");
        let first = db.get_paste("AAAAAAAA").await.unwrap().unwrap();
        assert_eq!(first.content, "first");
    }

    #[tokio::test]
    async fn exhausted_retries_is_an_error() {
        let db = memory_db().await;
        let now = Utc::now();
        db.insert_paste_with(|| "AAAAAAAA".to_owned(), "first", "u", None, now, None)
            .await
            .unwrap();

        let mut calls = 0;
        let err = db
            .insert_paste_with(
                || {
                    calls += 1;
                    "AAAAAAAA".to_owned()
                },
                "second",
                "u",
                None,
                now,
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::KeysExhausted {
                attempts: MAX_KEY_ATTEMPTS
            }
        ));
        assert_eq!(calls, MAX_KEY_ATTEMPTS);
    }
}
