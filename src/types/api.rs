use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeniedReason, NewPaste, PasteInfo};

#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub content: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub expires_after: Option<i64>,
}

impl From<CreateParams> for NewPaste {
    fn from(params: CreateParams) -> Self {
        NewPaste {
            content: params.content,
            owner_label: params.user_id,
            password: params.password,
            ttl_minutes: params.expires_after,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedPaste {
    pub url: String,
    pub url_id: String,
}

#[derive(Serialize)]
pub struct PasteContent {
    pub content: String,
    pub user_id: String,
}

#[derive(Serialize)]
pub struct PasteMeta {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

impl From<PasteInfo> for PasteMeta {
    fn from(info: PasteInfo) -> Self {
        PasteMeta {
            user_id: info.owner_label,
            created_at: info.created_at,
            expires_at: info.expires_at,
            is_expired: info.is_expired,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DeniedReason>,
}
