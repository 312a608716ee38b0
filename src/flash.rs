//! One-time notices carried between a redirect and the next rendered page.
//!
//! Notices are queued in the `flash` cookie as base64url-encoded JSON and removed
//! by the handler that displays them.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Notice,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn notice(message: impl Into<String>) -> Self {
        Self { level: Level::Notice, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }

    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Notice => "notice",
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

fn decode(value: &str) -> Vec<Notice> {
    let parsed = URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Vec<Notice>>(&bytes).ok());
    match parsed {
        Some(notices) => notices,
        None => {
            warn!("discarding malformed flash cookie");
            Vec::new()
        }
    }
}

fn encode(notices: &[Notice]) -> String {
    // Serializing plain strings cannot fail.
    let json = serde_json::to_vec(notices).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Queue a notice for the next rendered page.
pub fn push(jar: CookieJar, notice: Notice) -> CookieJar {
    let mut pending = jar
        .get(FLASH_COOKIE)
        .map(|c| decode(c.value()))
        .unwrap_or_default();
    pending.push(notice);
    jar.add(
        Cookie::build((FLASH_COOKIE, encode(&pending)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Drain every queued notice, clearing the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Notice>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, Vec::new());
    };
    let notices = decode(cookie.value());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, notices)
}
