use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use super::dto::InventoryForm;
use super::repo_types::NewVehicle;
use crate::validation::FieldErrors;

pub const CLASSIFICATION_EXISTS: &str = "Classification name already exists.";

lazy_static! {
    static ref ALPHA_RE: Regex = Regex::new(r"^[a-zA-Z]+$").unwrap();
    static ref VEHICLE_IMAGE_RE: Regex = Regex::new(r"^/images/vehicles/.*$").unwrap();
}

/// Trimmed classification name, or the rule it broke. Uniqueness is checked by
/// the caller.
pub fn validate_classification_name(raw: &str) -> Result<String, FieldErrors> {
    let name = raw.trim();
    let mut errors = FieldErrors::new();
    if name.is_empty() {
        errors.add("classification_name", "Please provide a classification name.");
    } else {
        errors.check(
            ALPHA_RE.is_match(name),
            "classification_name",
            "Name must be alphabetical characters only.",
        );
    }
    errors.finish(name.to_string())
}

/// Largest price the `NUMERIC(9, 2)` column holds.
fn max_price() -> Decimal {
    Decimal::new(999_999_999, 2)
}

fn parse_int(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

pub fn validate_inventory(form: &InventoryForm) -> Result<NewVehicle, FieldErrors> {
    let mut errors = FieldErrors::new();

    let classification_id = parse_int(&form.classification_id).filter(|id| *id >= 1);
    errors.check(
        classification_id.is_some(),
        "classification_id",
        "Please select a classification.",
    );

    let make = form.inv_make.trim();
    errors.check(make.chars().count() >= 3, "inv_make", "Please provide a make.");
    let model = form.inv_model.trim();
    errors.check(model.chars().count() >= 3, "inv_model", "Please provide a model.");

    let year = parse_int(&form.inv_year).filter(|y| (1000..=9999).contains(y));
    errors.check(year.is_some(), "inv_year", "Please provide a valid 4-digit year.");

    let description = form.inv_description.trim();
    errors.check(
        !description.is_empty(),
        "inv_description",
        "Please provide a description.",
    );

    let image = form.inv_image.trim();
    errors.check(
        VEHICLE_IMAGE_RE.is_match(image),
        "inv_image",
        "Please provide a valid image path.",
    );
    let thumbnail = form.inv_thumbnail.trim();
    errors.check(
        VEHICLE_IMAGE_RE.is_match(thumbnail),
        "inv_thumbnail",
        "Please provide a valid thumbnail path.",
    );

    let price = form
        .inv_price
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|p| !p.is_sign_negative() && *p <= max_price())
        .filter(|p| p.normalize().scale() <= 2);
    errors.check(price.is_some(), "inv_price", "Please provide a valid positive price.");

    let miles = parse_int(&form.inv_miles).filter(|m| *m >= 0);
    errors.check(miles.is_some(), "inv_miles", "Please provide a valid positive mileage.");

    let color = form.inv_color.trim();
    errors.check(!color.is_empty(), "inv_color", "Please provide a color.");

    match (classification_id, year, price, miles) {
        (Some(classification_id), Some(year), Some(price), Some(miles)) if errors.is_valid() => {
            Ok(NewVehicle {
                classification_id,
                make: make.to_string(),
                model: model.to_string(),
                year,
                description: description.to_string(),
                image: image.to_string(),
                thumbnail: thumbnail.to_string(),
                price,
                miles,
                color: color.to_string(),
            })
        }
        _ => Err(errors),
    }
}
