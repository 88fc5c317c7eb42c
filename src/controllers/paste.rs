use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::access::{self, Access};
use crate::models::Paste;
use crate::types::{ContentView, InfoView, NewPaste, PasteInfo};
use crate::{App, AppError, AppResult};

/// Store a new paste and return its row.
pub async fn create(app: &App, new: NewPaste) -> AppResult<Paste> {
    create_at(app, new, Utc::now()).await
}

pub async fn create_at(app: &App, new: NewPaste, now: DateTime<Utc>) -> AppResult<Paste> {
    let content = new.content.ok_or(AppError::MissingContent)?;
    let owner_label = new
        .owner_label
        .filter(|label| !label.is_empty())
        .ok_or(AppError::MissingOwner)?;
    let expires_at = expiry_from_ttl(new.ttl_minutes, now)?;

    let password_hash = match new.password.filter(|p| !p.is_empty()) {
        Some(password) => {
            let hasher = app.hasher;
            Some(tokio::task::spawn_blocking(move || hasher.hash(&password)).await??)
        }
        None => None,
    };

    let paste = app
        .database
        .insert_paste(
            &content,
            &owner_label,
            password_hash.as_deref(),
            now,
            expires_at,
        )
        .await?;

    info!(
        "new paste: url_id='{}', owner='{}', protected={}, expires_at={:?}, size={}",
        paste.url_id,
        paste.owner_label,
        paste.password_hash.is_some(),
        paste.expires_at,
        paste.content.len()
    );

    Ok(paste)
}

/// Read a paste's content, subject to expiry and password.
pub async fn view_content(
    app: &App,
    url_id: &str,
    password: Option<&str>,
) -> AppResult<ContentView> {
    view_content_at(app, url_id, password, Utc::now()).await
}

pub async fn view_content_at(
    app: &App,
    url_id: &str,
    password: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<ContentView> {
    let Some(paste) = app.database.get_paste(url_id).await? else {
        return Ok(ContentView::NotFound);
    };

    let password = password.filter(|p| !p.is_empty()).map(str::to_owned);
    let hasher = app.hasher;

    // bcrypt is slow enough to keep off the async workers
    let (paste, access) = if paste.password_hash.is_some() {
        tokio::task::spawn_blocking(move || {
            let access = access::evaluate(&paste, password.as_deref(), now, &hasher);
            (paste, access)
        })
        .await?
    } else {
        let access = access::evaluate(&paste, password.as_deref(), now, &hasher);
        (paste, access)
    };

    match access {
        Access::Granted => Ok(ContentView::Content {
            content: paste.content,
            owner_label: paste.owner_label,
        }),
        Access::Denied(reason) => {
            debug!("denied access to paste '{}': {reason}", paste.url_id);
            Ok(ContentView::Denied(reason))
        }
    }
}

/// Read a paste's metadata. The password hash is never consulted.
pub async fn view_info(app: &App, url_id: &str) -> AppResult<InfoView> {
    view_info_at(app, url_id, Utc::now()).await
}

pub async fn view_info_at(app: &App, url_id: &str, now: DateTime<Utc>) -> AppResult<InfoView> {
    let Some(paste) = app.database.get_paste(url_id).await? else {
        return Ok(InfoView::NotFound);
    };

    Ok(InfoView::Info(PasteInfo {
        is_expired: access::is_expired(paste.expires_at, now),
        owner_label: paste.owner_label,
        created_at: paste.created_at,
        expires_at: paste.expires_at,
    }))
}

fn expiry_from_ttl(
    ttl_minutes: Option<i64>,
    now: DateTime<Utc>,
) -> AppResult<Option<DateTime<Utc>>> {
    match ttl_minutes {
        None | Some(0) => Ok(None),
        Some(minutes) if minutes < 0 => Err(AppError::InvalidTtl),
        Some(minutes) => Duration::try_minutes(minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .map(Some)
            .ok_or(AppError::InvalidTtl),
    }
}
