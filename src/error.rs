//! Top-level error type.
//!
//! Handlers return `AppResult<T>`. Anything that reaches `IntoResponse` is logged
//! with its status and rendered as the generic error page; internal details never
//! leave the server.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::db::RepoError;
use crate::views::{ErrorTemplate, Layout};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("password hashing error: {0}")]
    Password(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

pub const PAGE_NOT_FOUND: &str = "Sorry, we could not find that page.";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repo(_) | Self::Template(_) | Self::Password(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the visitor.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(msg) => msg.clone(),
            _ => "Oh no! There was a crash. Maybe try a different route?".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        } else {
            warn!(status = %status, error = %self, "request rejected");
        }

        let page = ErrorTemplate {
            layout: Layout::bare(status.as_u16().to_string()),
            message: self.public_message(),
        };
        match askama::Template::render(&page) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!(error = %e, "error page failed to render");
                (status, self.public_message()).into_response()
            }
        }
    }
}
