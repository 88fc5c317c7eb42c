use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A stored paste. Rows are written once and never updated.
#[derive(Debug, Clone, FromRow)]
pub struct Paste {
    pub id: i64,
    pub content: String,
    pub owner_label: String,
    pub url_id: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
