use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod api;

/// Input to paste creation, as received from a transport.
#[derive(Debug, Clone, Default)]
pub struct NewPaste {
    pub content: Option<String>,
    pub owner_label: Option<String>,
    pub password: Option<String>,
    /// Minutes until the paste expires. `None` and `0` never expire.
    pub ttl_minutes: Option<i64>,
}

impl NewPaste {
    pub fn new(content: impl Into<String>, owner_label: impl Into<String>) -> Self {
        NewPaste {
            content: Some(content.into()),
            owner_label: Some(owner_label.into()),
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.ttl_minutes = Some(minutes);
        self
    }
}

/// Why a paste's content was withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeniedReason {
    Expired,
    /// Used both for a missing and a wrong password, so callers cannot tell
    /// protected pastes apart by the response.
    Unauthorized,
}

impl DeniedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeniedReason::Expired => "expired",
            DeniedReason::Unauthorized => "unauthorized",
        }
    }

    /// Human readable message for the transport.
    pub fn message(&self) -> &'static str {
        match self {
            DeniedReason::Expired => "This paste has expired",
            DeniedReason::Unauthorized => "Password required or incorrect",
        }
    }
}

impl fmt::Display for DeniedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a content read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    Content {
        content: String,
        owner_label: String,
    },
    Denied(DeniedReason),
    NotFound,
}

/// Paste metadata, never gated by password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteInfo {
    pub owner_label: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

/// Outcome of a metadata read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoView {
    Info(PasteInfo),
    NotFound,
}
