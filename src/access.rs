//! Decides whether a stored paste may be released. No I/O happens here.

use chrono::{DateTime, Utc};

use crate::models::Paste;
use crate::password::CredentialHasher;
use crate::types::DeniedReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(DeniedReason),
}

/// A paste is expired from its deadline onwards. No deadline means never.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.map_or(false, |deadline| now >= deadline)
}

/// Expiry is checked before the password, so an expired paste stays closed
/// even to the right password.
pub fn evaluate(
    paste: &Paste,
    password: Option<&str>,
    now: DateTime<Utc>,
    hasher: &CredentialHasher,
) -> Access {
    if is_expired(paste.expires_at, now) {
        return Access::Denied(DeniedReason::Expired);
    }

    let Some(digest) = &paste.password_hash else {
        return Access::Granted;
    };

    // verify even without a password so a missing and a wrong one cost the same
    let matches = hasher.verify(password.unwrap_or_default(), digest);
    if password.is_some() && matches {
        Access::Granted
    } else {
        Access::Denied(DeniedReason::Unauthorized)
    }
}
