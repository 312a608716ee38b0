//! Page layout and presentation helpers.

mod fragments;

use askama::Template;
use axum::response::Html;

pub use fragments::{build_classification_select, build_grid, build_nav, build_vehicle_detail};

use crate::auth::Session;
use crate::error::AppResult;
use crate::flash::Notice;
use crate::state::AppState;

/// Data every page shares: title, navigation, pending notices and the header's
/// login state.
pub struct Layout {
    pub title: String,
    pub nav: String,
    pub notices: Vec<Notice>,
    pub logged_in: bool,
    pub first_name: String,
    pub can_manage: bool,
}

impl Layout {
    pub async fn load(
        state: &AppState,
        session: &Session,
        title: impl Into<String>,
        notices: Vec<Notice>,
    ) -> AppResult<Self> {
        let classifications = state.inventory.list_classifications().await?;
        Ok(Self {
            title: title.into(),
            nav: build_nav(&classifications)?,
            notices,
            logged_in: session.is_logged_in(),
            first_name: session
                .account()
                .map(|a| a.account_firstname.clone())
                .unwrap_or_default(),
            can_manage: session.can_manage_inventory(),
        })
    }

    /// Layout without store access, used by the error page.
    pub fn bare(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nav: build_nav(&[]).unwrap_or_default(),
            notices: Vec::new(),
            logged_in: false,
            first_name: String::new(),
            can_manage: false,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub message: String,
}

pub fn render<T: Template>(page: &T) -> AppResult<Html<String>> {
    Ok(Html(page.render()?))
}
