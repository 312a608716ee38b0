use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, instrument, warn};

use super::dto::{ChangePasswordForm, LoginForm, RegisterForm, UpdateAccountForm};
use super::repo_types::NewAccount;
use super::validation::{
    validate_login, validate_new_password, validate_profile, validate_registration, EMAIL_EXISTS,
};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{RequireAccount, Session};
use crate::comments::repo_types::format_date;
use crate::db::RepoError;
use crate::error::{AppError, AppResult, PAGE_NOT_FOUND};
use crate::flash::{self, Notice};
use crate::state::AppState;
use crate::validation::parse_id;
use crate::views::{render, Layout};

pub const BAD_CREDENTIALS: &str = "Please check your credentials and try again.";
pub const CHECK_INFORMATION: &str = "Please check your information and try again.";
pub const NEW_EMAIL_EXISTS: &str = "Error: The new email address already exists in our system.";
pub const UPDATE_FAILED: &str = "Sorry, the update failed. Please try again.";
const UPDATE_TITLE: &str = "Update Account Information";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/account/", get(management))
        .route("/account/login", get(login_view).post(login))
        .route("/account/register", get(register_view).post(register))
        .route("/account/update/:account_id", get(update_view))
        .route("/account/update", post(update_account))
        .route("/account/change-password", post(change_password))
        .route("/account/logout", get(logout))
}

// --- pages ---

#[derive(Template)]
#[template(path = "account/login.html")]
struct LoginPage {
    layout: Layout,
    errors: Vec<String>,
    account_email: String,
}

#[derive(Template)]
#[template(path = "account/register.html")]
struct RegisterPage {
    layout: Layout,
    errors: Vec<String>,
    account_firstname: String,
    account_lastname: String,
    account_email: String,
}

struct OwnComment {
    vehicle: String,
    vehicle_href: String,
    date: String,
    text: String,
    edit_href: String,
    delete_href: String,
}

#[derive(Template)]
#[template(path = "account/management.html")]
struct ManagementPage {
    layout: Layout,
    update_href: String,
    comments: Vec<OwnComment>,
}

#[derive(Template)]
#[template(path = "account/update.html")]
struct UpdatePage {
    layout: Layout,
    errors: Vec<String>,
    account_firstname: String,
    account_lastname: String,
    account_email: String,
}

/// Values shown in the profile form.
struct ProfileValues {
    firstname: String,
    lastname: String,
    email: String,
}

impl From<&UpdateAccountForm> for ProfileValues {
    fn from(form: &UpdateAccountForm) -> Self {
        Self {
            firstname: form.account_firstname.clone(),
            lastname: form.account_lastname.clone(),
            email: form.account_email.clone(),
        }
    }
}

async fn login_page(
    state: &AppState,
    session: &Session,
    notices: Vec<Notice>,
    account_email: String,
    errors: Vec<String>,
) -> AppResult<Html<String>> {
    let page = LoginPage {
        layout: Layout::load(state, session, "Login", notices).await?,
        errors,
        account_email,
    };
    render(&page)
}

async fn register_page(
    state: &AppState,
    session: &Session,
    notices: Vec<Notice>,
    form: &RegisterForm,
    errors: Vec<String>,
) -> AppResult<Html<String>> {
    let page = RegisterPage {
        layout: Layout::load(state, session, "Register", notices).await?,
        errors,
        account_firstname: form.account_firstname.clone(),
        account_lastname: form.account_lastname.clone(),
        account_email: form.account_email.clone(),
    };
    render(&page)
}

async fn update_page(
    state: &AppState,
    session: &Session,
    notices: Vec<Notice>,
    values: ProfileValues,
    errors: Vec<String>,
) -> AppResult<Html<String>> {
    let page = UpdatePage {
        layout: Layout::load(state, session, UPDATE_TITLE, notices).await?,
        errors,
        account_firstname: values.firstname,
        account_lastname: values.lastname,
        account_email: values.email,
    };
    render(&page)
}

/// Profile form values as currently stored.
async fn stored_profile(state: &AppState, account_id: i32) -> AppResult<ProfileValues> {
    let account = state
        .accounts
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(PAGE_NOT_FOUND.into()))?;
    Ok(ProfileValues {
        firstname: account.account_firstname,
        lastname: account.account_lastname,
        email: account.account_email,
    })
}

// --- login / logout ---

#[instrument(skip_all)]
pub async fn login_view(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<Response> {
    if session.is_logged_in() {
        return Ok(Redirect::to("/account/").into_response());
    }
    let (jar, notices) = flash::take(jar);
    let html = login_page(&state, &session, notices, String::new(), Vec::new()).await?;
    Ok((jar, html).into_response())
}

#[instrument(skip(state, session, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let creds = match validate_login(&form) {
        Ok(creds) => creds,
        Err(errors) => {
            let (jar, mut notices) = flash::take(jar);
            notices.push(Notice::notice(CHECK_INFORMATION));
            let html =
                login_page(&state, &session, notices, form.account_email, errors.messages())
                    .await?;
            return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
        }
    };

    // Unknown email, wrong password and an unreadable hash look the same.
    let account = match state.accounts.find_by_email(&creds.email).await? {
        Some(account) => {
            let hash = account.account_password.clone();
            if verify_password_blocking(creds.password, hash).await {
                Some(account)
            } else {
                None
            }
        }
        None => None,
    };

    let Some(account) = account else {
        warn!(email = %creds.email, "login rejected");
        let (jar, mut notices) = flash::take(jar);
        notices.push(Notice::notice(BAD_CREDENTIALS));
        let html = login_page(&state, &session, notices, creds.email, Vec::new()).await?;
        return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
    };

    // Pending notices stay queued for the account page.
    let claims = account.into_claims();
    let jar = state
        .sessions
        .issue(jar, &claims)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    info!(account_id = claims.account_id, role = claims.account_type.as_str(), "logged in");
    Ok((jar, Redirect::to("/account/")).into_response())
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = state.sessions.clear(jar);
    let jar = flash::push(jar, Notice::notice("You have successfully logged out."));
    (jar, Redirect::to("/")).into_response()
}

// --- registration ---

#[instrument(skip_all)]
pub async fn register_view(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, notices) = flash::take(jar);
    let html = register_page(&state, &session, notices, &RegisterForm::default(), Vec::new()).await?;
    Ok((jar, html))
}

#[instrument(skip(state, session, jar, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let (jar, mut notices) = flash::take(jar);

    let registration = match validate_registration(&form) {
        Ok(registration) => registration,
        Err(errors) => {
            notices.push(Notice::notice("Please provide a valid email, password, and name."));
            let html = register_page(&state, &session, notices, &form, errors.messages()).await?;
            return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
        }
    };

    if state.accounts.email_taken(&registration.email, None).await? {
        let html =
            register_page(&state, &session, notices, &form, vec![EMAIL_EXISTS.into()]).await?;
        return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
    }

    let password_hash = match hash_password_blocking(registration.password).await {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "registration hash failed");
            let jar = flash::push(
                jar,
                Notice::error("Sorry, there was an error processing the registration."),
            );
            return Ok((jar, Redirect::to("/account/register")).into_response());
        }
    };

    let new_account = NewAccount {
        firstname: registration.firstname,
        lastname: registration.lastname,
        email: registration.email,
        password_hash,
    };
    match state.accounts.create(new_account).await {
        Ok(account) => {
            info!(account_id = account.account_id, "account registered");
            let jar = flash::push(
                jar,
                Notice::success(format!(
                    "Congratulations, {}, you are registered! Please log in.",
                    account.account_firstname
                )),
            );
            Ok((jar, Redirect::to("/account/login")).into_response())
        }
        Err(e) => {
            error!(error = %e, "registration insert failed");
            let jar = flash::push(jar, Notice::error("Sorry, the registration failed."));
            Ok((jar, Redirect::to("/account/register")).into_response())
        }
    }
}

// --- account management ---

#[instrument(skip(state, session, jar), fields(account_id = account.account_id))]
pub async fn management(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let comments = state
        .comments
        .list_for_account(account.account_id)
        .await?
        .into_iter()
        .map(|c| OwnComment {
            vehicle: format!("{} {}", c.inv_make, c.inv_model),
            vehicle_href: format!("/detail/{}", c.inv_id),
            date: format_date(c.comment_date),
            text: c.comment_text,
            edit_href: format!("/comment/edit/{}", c.comment_id),
            delete_href: format!("/comment/delete/{}", c.comment_id),
        })
        .collect();

    let (jar, notices) = flash::take(jar);
    let page = ManagementPage {
        layout: Layout::load(&state, &session, "Account Management", notices).await?,
        update_href: format!("/account/update/{}", account.account_id),
        comments,
    };
    Ok((jar, render(&page)?))
}

#[instrument(skip(state, session, jar), fields(account_id = account.account_id))]
pub async fn update_view(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    session: Session,
    jar: CookieJar,
    Path(target): Path<String>,
) -> AppResult<Response> {
    if parse_id(&target) != Some(account.account_id) {
        warn!(target = %target, "update view refused");
        let jar = flash::push(jar, Notice::notice("You are not authorized to update this account."));
        return Ok((jar, Redirect::to("/account/")).into_response());
    }
    let values = stored_profile(&state, account.account_id).await?;
    let (jar, notices) = flash::take(jar);
    let html = update_page(&state, &session, notices, values, Vec::new()).await?;
    Ok((jar, html).into_response())
}

#[instrument(skip(state, session, jar, form), fields(account_id = account.account_id))]
pub async fn update_account(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    session: Session,
    jar: CookieJar,
    Form(form): Form<UpdateAccountForm>,
) -> AppResult<Response> {
    let (jar, mut notices) = flash::take(jar);
    let account_id = account.account_id;

    let profile = match validate_profile(&form) {
        Ok(profile) => profile,
        Err(errors) => {
            notices.push(Notice::notice(CHECK_INFORMATION));
            let html =
                update_page(&state, &session, notices, (&form).into(), errors.messages()).await?;
            return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
        }
    };

    let current = stored_profile(&state, account_id).await?;
    if profile.email != current.email
        && state.accounts.email_taken(&profile.email, Some(account_id)).await?
    {
        notices.push(Notice::notice(NEW_EMAIL_EXISTS));
        let html = update_page(&state, &session, notices, (&form).into(), Vec::new()).await?;
        return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
    }

    let failure = match state.accounts.update_profile(account_id, profile).await {
        Ok(Some(updated)) => {
            info!("account updated");
            let message = format!(
                "Success! {}'s account information was successfully updated.",
                updated.account_firstname
            );
            let jar = state
                .sessions
                .issue(jar, &updated.into_claims())
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let jar = flash::push(jar, Notice::success(message));
            return Ok((jar, Redirect::to("/account/")).into_response());
        }
        Ok(None) => (StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED),
        // Another account claimed the address between the check and the write.
        Err(RepoError::Conflict(_)) => (StatusCode::BAD_REQUEST, NEW_EMAIL_EXISTS),
        Err(e) => {
            error!(error = %e, "account update failed");
            (StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED)
        }
    };
    let (status, message) = failure;
    notices.push(Notice::error(message));
    let html = update_page(&state, &session, notices, (&form).into(), Vec::new()).await?;
    Ok((status, jar, html).into_response())
}

#[instrument(skip(state, session, jar, form), fields(account_id = account.account_id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    session: Session,
    jar: CookieJar,
    Form(form): Form<ChangePasswordForm>,
) -> AppResult<Response> {
    let (jar, mut notices) = flash::take(jar);
    let account_id = account.account_id;

    let password = match validate_new_password(&form) {
        Ok(password) => password,
        Err(errors) => {
            notices.push(Notice::notice(
                "Password does not meet requirements. Please try again.",
            ));
            let values = stored_profile(&state, account_id).await?;
            let html = update_page(&state, &session, notices, values, errors.messages()).await?;
            return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
        }
    };

    let hash = match hash_password_blocking(password).await {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "password hash failed");
            let jar = flash::push(jar, Notice::error("An error occurred during password hashing."));
            return Ok((jar, Redirect::to("/account/")).into_response());
        }
    };

    match state.accounts.update_password(account_id, &hash).await {
        Ok(rows) if rows > 0 => {
            info!("password changed");
            let jar = flash::push(
                jar,
                Notice::success("Success! Your password was successfully changed."),
            );
            Ok((jar, Redirect::to("/account/")).into_response())
        }
        result => {
            if let Err(e) = result {
                error!(error = %e, "password update failed");
            }
            notices.push(Notice::error(
                "Sorry, the password change failed. Please try again.",
            ));
            let values = stored_profile(&state, account_id).await?;
            let html = update_page(&state, &session, notices, values, Vec::new()).await?;
            Ok((StatusCode::INTERNAL_SERVER_ERROR, jar, html).into_response())
        }
    }
}
