use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::{cookie::CookieJar, Query};
use tracing::{error, info, instrument};

use super::dto::{ClassificationForm, InventoryForm, SortParams};
use super::sort;
use super::validation::{validate_classification_name, validate_inventory, CLASSIFICATION_EXISTS};
use crate::auth::{RequireEmployee, Session};
use crate::comments::repo_types::format_date;
use crate::db::RepoError;
use crate::error::{AppError, AppResult, PAGE_NOT_FOUND};
use crate::flash::{self, Notice};
use crate::state::AppState;
use crate::validation::parse_id;
use crate::views::{build_classification_select, build_grid, build_vehicle_detail, render, Layout};

pub const VEHICLE_NOT_FOUND: &str = "Sorry, that vehicle could not be found.";

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/category/:classification_id", get(classification_view))
        .route("/detail/:inv_id", get(vehicle_detail))
}

pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/inv", get(management))
        .route(
            "/inv/add-classification",
            get(add_classification_view).post(add_classification),
        )
        .route(
            "/inv/add-inventory",
            get(add_inventory_view).post(add_inventory),
        )
}

// --- pages ---

struct SortLink {
    href: String,
    label: &'static str,
}

#[derive(Template)]
#[template(path = "inventory/classification.html")]
struct ClassificationPage {
    layout: Layout,
    grid: String,
    sort_links: Vec<SortLink>,
}

struct CommentView {
    author: String,
    date: String,
    text: String,
    own: bool,
    edit_href: String,
    delete_href: String,
}

#[derive(Template)]
#[template(path = "inventory/detail.html")]
struct DetailPage {
    layout: Layout,
    detail: String,
    inv_id: i32,
    comments: Vec<CommentView>,
}

#[derive(Template)]
#[template(path = "inventory/management.html")]
struct ManagementPage {
    layout: Layout,
}

#[derive(Template)]
#[template(path = "inventory/add_classification.html")]
struct AddClassificationPage {
    layout: Layout,
    errors: Vec<String>,
    classification_name: String,
}

#[derive(Template)]
#[template(path = "inventory/add_inventory.html")]
struct AddInventoryPage {
    layout: Layout,
    errors: Vec<String>,
    form: InventoryForm,
    classification_select: String,
}

// --- handlers ---

#[instrument(skip(state, session, jar))]
pub async fn classification_view(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Path(classification_id): Path<String>,
    Query(params): Query<SortParams>,
) -> AppResult<(CookieJar, Html<String>)> {
    let page_not_found = || AppError::NotFound(PAGE_NOT_FOUND.into());
    let classification_id = parse_id(&classification_id).ok_or_else(page_not_found)?;
    let classification = state
        .inventory
        .find_classification(classification_id)
        .await?
        .ok_or_else(page_not_found)?;

    let keys = sort::resolve(&params.sort);
    let vehicles = state
        .inventory
        .list_by_classification(classification_id, &keys)
        .await?;

    let sort_links = [
        ("name_asc", "Name: A to Z"),
        ("name_desc", "Name: Z to A"),
        ("price_asc", "Price: low to high"),
        ("price_desc", "Price: high to low"),
    ]
    .into_iter()
    .map(|(key, label)| SortLink {
        href: format!("/category/{classification_id}?sort={key}"),
        label,
    })
    .collect();

    let (jar, notices) = flash::take(jar);
    let title = format!("{} vehicles", classification.classification_name);
    let page = ClassificationPage {
        layout: Layout::load(&state, &session, title, notices).await?,
        grid: build_grid(&vehicles)?,
        sort_links,
    };
    Ok((jar, render(&page)?))
}

#[instrument(skip(state, session, jar))]
pub async fn vehicle_detail(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Path(inv_id): Path<String>,
) -> AppResult<(CookieJar, Html<String>)> {
    let inv_id = parse_id(&inv_id).ok_or_else(|| AppError::NotFound(VEHICLE_NOT_FOUND.into()))?;
    let vehicle = state
        .inventory
        .find_vehicle(inv_id)
        .await?
        .ok_or_else(|| AppError::NotFound(VEHICLE_NOT_FOUND.into()))?;

    let viewer = session.account().map(|a| a.account_id);
    let comments = state
        .comments
        .list_for_vehicle(inv_id)
        .await?
        .into_iter()
        .map(|c| CommentView {
            author: format!("{} {}", c.account_firstname, c.account_lastname),
            date: format_date(c.comment_date),
            text: c.comment_text,
            own: viewer == Some(c.account_id),
            edit_href: format!("/comment/edit/{}", c.comment_id),
            delete_href: format!("/comment/delete/{}", c.comment_id),
        })
        .collect();

    let (jar, notices) = flash::take(jar);
    let page = DetailPage {
        layout: Layout::load(&state, &session, vehicle.display_name(), notices).await?,
        detail: build_vehicle_detail(&vehicle)?,
        inv_id,
        comments,
    };
    Ok((jar, render(&page)?))
}

#[instrument(skip_all)]
pub async fn management(
    State(state): State<AppState>,
    _employee: RequireEmployee,
    session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, notices) = flash::take(jar);
    let page = ManagementPage {
        layout: Layout::load(&state, &session, "Vehicle Management", notices).await?,
    };
    Ok((jar, render(&page)?))
}

#[instrument(skip_all)]
pub async fn add_classification_view(
    State(state): State<AppState>,
    _employee: RequireEmployee,
    session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, notices) = flash::take(jar);
    let page = AddClassificationPage {
        layout: Layout::load(&state, &session, "Add New Classification", notices).await?,
        errors: Vec::new(),
        classification_name: String::new(),
    };
    Ok((jar, render(&page)?))
}

async fn add_classification_page(
    state: &AppState,
    session: &Session,
    notices: Vec<Notice>,
    classification_name: String,
    errors: Vec<String>,
) -> AppResult<Html<String>> {
    let page = AddClassificationPage {
        layout: Layout::load(state, session, "Add New Classification", notices).await?,
        errors,
        classification_name,
    };
    render(&page)
}

#[instrument(skip(state, session, jar, form), fields(account_id = employee.account_id))]
pub async fn add_classification(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    session: Session,
    jar: CookieJar,
    Form(form): Form<ClassificationForm>,
) -> AppResult<Response> {
    let (jar, mut notices) = flash::take(jar);
    let submitted = form.classification_name;

    let name = match validate_classification_name(&submitted) {
        Ok(name) => name,
        Err(errors) => {
            let html =
                add_classification_page(&state, &session, notices, submitted, errors.messages())
                    .await?;
            return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
        }
    };

    let exists = vec![CLASSIFICATION_EXISTS.to_string()];
    if state.inventory.classification_exists(&name).await? {
        let html = add_classification_page(&state, &session, notices, submitted, exists).await?;
        return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
    }

    match state.inventory.create_classification(&name).await {
        Ok(created) => {
            info!(classification_id = created.classification_id, name = %name, "classification added");
            let jar = flash::push(
                jar,
                Notice::success(format!("The {name} classification was successfully added.")),
            );
            Ok((jar, Redirect::to("/inv")).into_response())
        }
        // Lost the race against a concurrent insert of the same name.
        Err(RepoError::Conflict(_)) => {
            let html =
                add_classification_page(&state, &session, notices, submitted, exists).await?;
            Ok((StatusCode::BAD_REQUEST, jar, html).into_response())
        }
        Err(e) => {
            error!(error = %e, "create classification failed");
            notices.push(Notice::error("Sorry, adding the classification failed."));
            let html =
                add_classification_page(&state, &session, notices, submitted, Vec::new()).await?;
            Ok((StatusCode::INTERNAL_SERVER_ERROR, jar, html).into_response())
        }
    }
}

async fn add_inventory_page(
    state: &AppState,
    session: &Session,
    notices: Vec<Notice>,
    form: InventoryForm,
    errors: Vec<String>,
) -> AppResult<Html<String>> {
    let classifications = state.inventory.list_classifications().await?;
    let selected = form.classification_id.trim().parse().ok();
    let page = AddInventoryPage {
        layout: Layout::load(state, session, "Add New Inventory Item", notices).await?,
        errors,
        classification_select: build_classification_select(&classifications, selected)?,
        form,
    };
    render(&page)
}

#[instrument(skip_all)]
pub async fn add_inventory_view(
    State(state): State<AppState>,
    _employee: RequireEmployee,
    session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, notices) = flash::take(jar);
    let html =
        add_inventory_page(&state, &session, notices, InventoryForm::default(), Vec::new()).await?;
    Ok((jar, html))
}

#[instrument(skip(state, session, jar, form), fields(account_id = employee.account_id))]
pub async fn add_inventory(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    session: Session,
    jar: CookieJar,
    Form(form): Form<InventoryForm>,
) -> AppResult<Response> {
    let (jar, mut notices) = flash::take(jar);

    let vehicle = match validate_inventory(&form) {
        Ok(vehicle) => vehicle,
        Err(errors) => {
            let html =
                add_inventory_page(&state, &session, notices, form, errors.messages()).await?;
            return Ok((StatusCode::BAD_REQUEST, jar, html).into_response());
        }
    };

    let label = format!("{} {} {}", vehicle.year, vehicle.make, vehicle.model);
    match state.inventory.create_vehicle(vehicle).await {
        Ok(created) => {
            info!(inv_id = created.inv_id, "vehicle added");
            let jar = flash::push(
                jar,
                Notice::success(format!("The {label} was successfully added.")),
            );
            Ok((jar, Redirect::to("/inv")).into_response())
        }
        Err(e) => {
            error!(error = %e, "create vehicle failed");
            notices.push(Notice::error("Sorry, adding the vehicle failed."));
            let html = add_inventory_page(&state, &session, notices, form, Vec::new()).await?;
            Ok((StatusCode::INTERNAL_SERVER_ERROR, jar, html).into_response())
        }
    }
}
