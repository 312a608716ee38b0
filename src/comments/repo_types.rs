use sqlx::FromRow;
use time::{macros::format_description, OffsetDateTime};

/// Comment row as stored.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Comment {
    pub comment_id: i32,
    pub comment_text: String,
    pub comment_date: OffsetDateTime,
    pub account_id: i32,
    pub inv_id: i32,
}

/// Comment on a vehicle page, with the author's name.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct VehicleComment {
    pub comment_id: i32,
    pub comment_text: String,
    pub comment_date: OffsetDateTime,
    pub account_id: i32,
    pub account_firstname: String,
    pub account_lastname: String,
}

/// Comment in an account's own listing, with the vehicle it belongs to.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AccountComment {
    pub comment_id: i32,
    pub comment_text: String,
    pub comment_date: OffsetDateTime,
    pub inv_id: i32,
    pub inv_make: String,
    pub inv_model: String,
}

/// `Jan 5, 2025` style date for listings.
pub fn format_date(date: OffsetDateTime) -> String {
    date.format(format_description!(
        "[month repr:short] [day padding:none], [year]"
    ))
    .unwrap_or_default()
}
