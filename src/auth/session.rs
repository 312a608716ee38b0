//! Cookie-carried session: token issuance, the per-request session middleware and
//! the route guards built on top of it.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use super::claims::AccountClaims;
use super::jwt::JwtKeys;
use crate::config::JwtConfig;
use crate::flash::{self, Notice};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "jwt";

pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const LOGIN_REQUIRED: &str = "Please log in to continue.";
pub const INVENTORY_LOGIN_REQUIRED: &str =
    "Please log in to access the inventory management area.";
pub const INVENTORY_FORBIDDEN: &str =
    "You do not have the required permissions to access the inventory management area.";

/// Signs session tokens and shapes the cookie that carries them.
pub struct SessionService {
    keys: JwtKeys,
    secure: bool,
}

impl SessionService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            keys: JwtKeys::new(config),
            secure: config.cookie_secure,
        }
    }

    /// Add a freshly signed session cookie for `account` to the jar. The cookie
    /// lives exactly as long as the token inside it.
    pub fn issue(&self, jar: CookieJar, account: &AccountClaims) -> anyhow::Result<CookieJar> {
        let token = self.keys.sign(account)?;
        Ok(jar.add(
            Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .secure(self.secure)
                .same_site(SameSite::Lax)
                .max_age(self.keys.ttl),
        ))
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<AccountClaims> {
        Ok(self.keys.verify(token)?.account)
    }

    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

/// Authentication state of the current request.
#[derive(Debug, Clone, Default)]
pub struct Session(Option<AccountClaims>);

impl Session {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(account: AccountClaims) -> Self {
        Self(Some(account))
    }

    pub fn account(&self) -> Option<&AccountClaims> {
        self.0.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.0.is_some()
    }

    pub fn can_manage_inventory(&self) -> bool {
        self.0
            .as_ref()
            .is_some_and(|a| a.account_type.can_manage_inventory())
    }
}

/// Derive the request's `Session` from the `jwt` cookie.
///
/// An invalid or expired token never blocks the request: the cookie is cleared,
/// a notice is queued and the request continues anonymously. Route guards decide
/// whether a login is required.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        req.extensions_mut().insert(Session::anonymous());
        return next.run(req).await;
    };

    match state.sessions.verify(&token) {
        Ok(account) => {
            req.extensions_mut().insert(Session::authenticated(account));
            next.run(req).await
        }
        Err(e) => {
            warn!(error = %e, "discarding invalid session token");

            // Downstream sees no token and the expiry notice already queued, so
            // handlers that push or take notices keep it in order.
            let pending = flash::push(
                jar.clone().remove(Cookie::build(SESSION_COOKIE)),
                Notice::notice(SESSION_EXPIRED),
            );
            replace_cookie_header(&mut req, &pending);
            req.extensions_mut().insert(Session::anonymous());
            let res = next.run(req).await;

            let mut outgoing = jar;
            // A handler that just logged someone in owns the cookie now.
            if !sets_cookie(&res, SESSION_COOKIE, true) {
                outgoing = state.sessions.clear(outgoing);
            }
            if !sets_cookie(&res, flash::FLASH_COOKIE, false) {
                if let Some(cookie) = pending.get(flash::FLASH_COOKIE) {
                    outgoing = outgoing.add(cookie.clone());
                }
            }
            (outgoing, res).into_response()
        }
    }
}

fn replace_cookie_header(req: &mut Request, jar: &CookieJar) {
    let header = jar
        .iter()
        .map(|c| format!("{}={}", c.name(), c.value()))
        .collect::<Vec<_>>()
        .join("; ");
    req.headers_mut().remove(COOKIE);
    if header.is_empty() {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&header) {
        req.headers_mut().insert(COOKIE, value);
    }
}

/// Whether the response sets cookie `name`. With `live_only`, removals don't count.
fn sets_cookie(res: &Response, name: &str, live_only: bool) -> bool {
    let prefix = format!("{name}=");
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix) && !(live_only && v.contains("Max-Age=0")))
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(current_session(parts))
    }
}

fn current_session(parts: &Parts) -> Session {
    parts.extensions.get::<Session>().cloned().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    LoginRequired(&'static str),
    Forbidden,
}

/// Guard rejection: a redirect carrying a notice. Notices already queued on the
/// request are kept.
#[derive(Debug)]
pub struct AuthRejection {
    pub failure: AuthFailure,
    jar: CookieJar,
}

impl AuthRejection {
    fn new(parts: &Parts, failure: AuthFailure) -> Self {
        Self {
            failure,
            jar: CookieJar::from_headers(&parts.headers),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (target, message) = match self.failure {
            AuthFailure::LoginRequired(message) => ("/account/login", message),
            AuthFailure::Forbidden => ("/account/", INVENTORY_FORBIDDEN),
        };
        let jar = flash::push(self.jar, Notice::notice(message));
        (jar, Redirect::to(target)).into_response()
    }
}

/// Requires a logged-in account.
pub struct RequireAccount(pub AccountClaims);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAccount
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_session(parts).0 {
            Some(account) => Ok(RequireAccount(account)),
            None => Err(AuthRejection::new(parts, AuthFailure::LoginRequired(LOGIN_REQUIRED))),
        }
    }
}

/// Requires a logged-in Employee or Admin.
pub struct RequireEmployee(pub AccountClaims);

#[async_trait]
impl<S> FromRequestParts<S> for RequireEmployee
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(account) = current_session(parts).0 else {
            return Err(AuthRejection::new(
                parts,
                AuthFailure::LoginRequired(INVENTORY_LOGIN_REQUIRED),
            ));
        };
        if !account.account_type.can_manage_inventory() {
            return Err(AuthRejection::new(parts, AuthFailure::Forbidden));
        }
        Ok(RequireEmployee(account))
    }
}
