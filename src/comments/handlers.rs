use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, instrument, warn};

use super::dto::{NewCommentForm, UpdateCommentForm};
use super::services::{can_mutate, validate_comment_text};
use crate::auth::{RequireAccount, Session};
use crate::db::RepoError;
use crate::error::{AppError, AppResult};
use crate::flash::{self, Notice};
use crate::inventory::handlers::VEHICLE_NOT_FOUND;
use crate::state::AppState;
use crate::validation::parse_id;
use crate::views::{render, Layout};

pub const NOT_AUTHORIZED_EDIT: &str = "You are not authorized to edit this comment.";
pub const NOT_AUTHORIZED_UPDATE: &str = "You are not authorized to update this comment.";
pub const NOT_AUTHORIZED_DELETE: &str = "You are not authorized to delete this comment.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inv/comment/add", post(add_comment))
        .route("/comment/edit/:comment_id", get(edit_comment_view))
        .route("/comment/update", post(update_comment))
        .route("/comment/delete/:comment_id", get(delete_comment))
}

#[derive(Template)]
#[template(path = "comments/edit.html")]
struct EditCommentPage {
    layout: Layout,
    comment_id: i32,
    comment_text: String,
    vehicle_href: String,
}

fn redirect_with(jar: CookieJar, notice: Notice, to: &str) -> Response {
    (flash::push(jar, notice), Redirect::to(to)).into_response()
}

#[instrument(skip(state, jar, form), fields(account_id = account.account_id))]
pub async fn add_comment(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    jar: CookieJar,
    Form(form): Form<NewCommentForm>,
) -> AppResult<Response> {
    let inv_id =
        parse_id(&form.inv_id).ok_or_else(|| AppError::NotFound(VEHICLE_NOT_FOUND.into()))?;
    let detail = format!("/detail/{inv_id}");

    let text = match validate_comment_text(&form.comment_text) {
        Ok(text) => text,
        Err(errors) => {
            let message = errors.messages().join(" ");
            return Ok(redirect_with(jar, Notice::error(message), &detail));
        }
    };

    match state.comments.create(account.account_id, inv_id, &text).await {
        Ok(comment) => {
            info!(comment_id = comment.comment_id, inv_id, "comment posted");
            Ok(redirect_with(
                jar,
                Notice::success("Your comment was successfully posted."),
                &detail,
            ))
        }
        Err(RepoError::ForeignKey(_)) => Err(AppError::NotFound(VEHICLE_NOT_FOUND.into())),
        Err(e) => {
            error!(error = %e, inv_id, "create comment failed");
            Ok(redirect_with(
                jar,
                Notice::error("Sorry, an internal error occurred during submission."),
                &detail,
            ))
        }
    }
}

#[instrument(skip(state, session, jar), fields(account_id = account.account_id))]
pub async fn edit_comment_view(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    session: Session,
    jar: CookieJar,
    Path(comment_id): Path<String>,
) -> AppResult<Response> {
    let found = match parse_id(&comment_id) {
        Some(id) => state.comments.find(id).await?,
        None => None,
    };
    let comment = match found {
        Some(c) if can_mutate(&c, account.account_id) => c,
        _ => {
            warn!(comment_id = %comment_id, "edit refused");
            return Ok(redirect_with(jar, Notice::notice(NOT_AUTHORIZED_EDIT), "/account/"));
        }
    };

    let (jar, notices) = flash::take(jar);
    let page = EditCommentPage {
        layout: Layout::load(&state, &session, "Edit Comment", notices).await?,
        comment_id: comment.comment_id,
        comment_text: comment.comment_text,
        vehicle_href: format!("/detail/{}", comment.inv_id),
    };
    let html: Html<String> = render(&page)?;
    Ok((jar, html).into_response())
}

#[instrument(skip(state, jar, form), fields(account_id = account.account_id))]
pub async fn update_comment(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    jar: CookieJar,
    Form(form): Form<UpdateCommentForm>,
) -> AppResult<Response> {
    let Some(comment_id) = parse_id(&form.comment_id) else {
        return Ok(redirect_with(jar, Notice::notice(NOT_AUTHORIZED_UPDATE), "/account/"));
    };

    // Ownership is checked again here; the edit form may be stale.
    let owned = state
        .comments
        .find(comment_id)
        .await?
        .is_some_and(|c| can_mutate(&c, account.account_id));
    if !owned {
        warn!(comment_id, "update refused");
        return Ok(redirect_with(jar, Notice::notice(NOT_AUTHORIZED_UPDATE), "/account/"));
    }

    let edit = format!("/comment/edit/{comment_id}");
    let text = match validate_comment_text(&form.comment_text) {
        Ok(text) => text,
        Err(errors) => {
            let message = errors.messages().join(" ");
            return Ok(redirect_with(jar, Notice::error(message), &edit));
        }
    };

    match state.comments.update(comment_id, account.account_id, &text).await {
        Ok(rows) if rows > 0 => {
            info!(comment_id, "comment updated");
            Ok(redirect_with(
                jar,
                Notice::success("Comment successfully updated."),
                "/account/",
            ))
        }
        Ok(_) => Ok(redirect_with(
            jar,
            Notice::error("Comment update failed. Please try again."),
            &edit,
        )),
        Err(e) => {
            error!(error = %e, comment_id, "update comment failed");
            Ok(redirect_with(
                jar,
                Notice::error("A server error occurred during update."),
                &edit,
            ))
        }
    }
}

#[instrument(skip(state, jar), fields(account_id = account.account_id))]
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    jar: CookieJar,
    Path(comment_id): Path<String>,
) -> AppResult<Response> {
    let Some(comment_id) = parse_id(&comment_id) else {
        warn!(comment_id = %comment_id, "delete refused");
        return Ok(redirect_with(jar, Notice::notice(NOT_AUTHORIZED_DELETE), "/account/"));
    };
    let owned = state
        .comments
        .find(comment_id)
        .await?
        .is_some_and(|c| can_mutate(&c, account.account_id));
    if !owned {
        warn!(comment_id, "delete refused");
        return Ok(redirect_with(jar, Notice::notice(NOT_AUTHORIZED_DELETE), "/account/"));
    }

    let notice = match state.comments.delete(comment_id, account.account_id).await {
        Ok(rows) if rows > 0 => {
            info!(comment_id, "comment deleted");
            Notice::success("Comment successfully deleted.")
        }
        Ok(_) => Notice::error("Comment deletion failed."),
        Err(e) => {
            error!(error = %e, comment_id, "delete comment failed");
            Notice::error("Comment deletion failed.")
        }
    };
    Ok(redirect_with(jar, notice, "/account/"))
}
