use askama::Template;
use axum::{extract::State, response::Html, routing::get, Router};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::auth::Session;
use crate::error::{AppError, AppResult, PAGE_NOT_FOUND};
use crate::flash;
use crate::state::AppState;
use crate::views::{render, Layout};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/500", get(crash))
}

#[derive(Template)]
#[template(path = "index.html")]
struct HomePage {
    layout: Layout,
}

#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, notices) = flash::take(jar);
    let page = HomePage {
        layout: Layout::load(&state, &session, "Home", notices).await?,
    };
    Ok((jar, render(&page)?))
}

/// Deliberate failure for exercising the error page.
pub async fn crash() -> AppError {
    AppError::Internal("intentional error from /500".into())
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound(PAGE_NOT_FOUND.into())
}
