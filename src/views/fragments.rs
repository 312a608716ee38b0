//! HTML fragments embedded into full pages: navigation, the vehicle grid, the
//! vehicle detail panel and the classification selector.

use askama::Template;
use rust_decimal::Decimal;

use crate::inventory::repo_types::{Classification, Vehicle};

struct NavLink {
    href: String,
    title: String,
    label: String,
}

#[derive(Template)]
#[template(path = "fragments/nav.html")]
struct NavFragment {
    links: Vec<NavLink>,
}

pub fn build_nav(classifications: &[Classification]) -> askama::Result<String> {
    let mut links = vec![NavLink {
        href: "/".into(),
        title: "Home page".into(),
        label: "Home".into(),
    }];
    links.extend(classifications.iter().map(|c| NavLink {
        href: format!("/category/{}", c.classification_id),
        title: format!("See our inventory of {} vehicles", c.classification_name),
        label: c.classification_name.clone(),
    }));
    NavFragment { links }.render()
}

struct VehicleCard {
    href: String,
    name: String,
    thumbnail: String,
    price: String,
}

#[derive(Template)]
#[template(path = "fragments/grid.html")]
struct GridFragment {
    cards: Vec<VehicleCard>,
}

pub fn build_grid(vehicles: &[Vehicle]) -> askama::Result<String> {
    let cards = vehicles
        .iter()
        .map(|v| VehicleCard {
            href: format!("/detail/{}", v.inv_id),
            name: v.display_name(),
            thumbnail: v.inv_thumbnail.clone(),
            price: format_price(v.inv_price),
        })
        .collect();
    GridFragment { cards }.render()
}

#[derive(Template)]
#[template(path = "fragments/vehicle_detail.html")]
struct DetailFragment<'a> {
    vehicle: &'a Vehicle,
    name: String,
    price: String,
    miles: String,
}

pub fn build_vehicle_detail(vehicle: &Vehicle) -> askama::Result<String> {
    DetailFragment {
        vehicle,
        name: vehicle.display_name(),
        price: format_price(vehicle.inv_price),
        miles: group_thousands(&vehicle.inv_miles.to_string()),
    }
    .render()
}

struct SelectOption {
    id: i32,
    name: String,
    selected: bool,
}

#[derive(Template)]
#[template(path = "fragments/classification_select.html")]
struct ClassificationSelect {
    options: Vec<SelectOption>,
}

/// `<select>` over every classification, with `selected` pre-chosen.
pub fn build_classification_select(
    classifications: &[Classification],
    selected: Option<i32>,
) -> askama::Result<String> {
    let options = classifications
        .iter()
        .map(|c| SelectOption {
            id: c.classification_id,
            name: c.classification_name.clone(),
            selected: Some(c.classification_id) == selected,
        })
        .collect();
    ClassificationSelect { options }.render()
}

/// Insert `,` separators into a run of ASCII digits, keeping any leading sign.
pub fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

/// `$25,000` style price, keeping cents only when present.
pub fn format_price(price: Decimal) -> String {
    let text = price.round_dp(2).normalize().to_string();
    match text.split_once('.') {
        Some((whole, cents)) => format!("${}.{cents}", group_thousands(whole)),
        None => format!("${}", group_thousands(&text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn vehicle() -> Vehicle {
        Vehicle {
            inv_id: 5,
            inv_make: "Jeep".into(),
            inv_model: "Wrangler".into(),
            inv_year: 2019,
            inv_description: "The <b>ultimate</b> off-roader".into(),
            inv_image: "/images/vehicles/wrangler.jpg".into(),
            inv_thumbnail: "/images/vehicles/wrangler-tn.jpg".into(),
            inv_price: Decimal::from(28045),
            inv_miles: 41205,
            inv_color: "Yellow".into(),
            classification_id: 4,
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-25000"), "-25,000");
    }

    #[test]
    fn prices_drop_empty_cents() {
        assert_eq!(format_price(Decimal::from(25000)), "$25,000");
        assert_eq!(format_price(Decimal::from_str("25000.00").unwrap()), "$25,000");
        assert_eq!(format_price(Decimal::from_str("1999.5").unwrap()), "$1,999.5");
        assert_eq!(format_price(Decimal::from_str("0.129").unwrap()), "$0.13");
    }

    #[test]
    fn nav_starts_with_home_and_links_categories() {
        let html = build_nav(&[
            Classification { classification_id: 2, classification_name: "Sedan".into() },
            Classification { classification_id: 5, classification_name: "Truck".into() },
        ])
        .unwrap();
        let home = html.find("Home").unwrap();
        let sedan = html.find("/category/2").unwrap();
        assert!(home < sedan);
        assert!(html.contains("/category/5"));
    }

    #[test]
    fn empty_grid_shows_notice() {
        let html = build_grid(&[]).unwrap();
        assert!(html.contains("Sorry, no vehicles could be found."));
        assert!(!html.contains("inv-display"));
    }

    #[test]
    fn grid_links_to_detail_pages() {
        let html = build_grid(&[vehicle()]).unwrap();
        assert!(html.contains("/detail/5"));
        assert!(html.contains("$28,045"));
        assert!(html.contains("Jeep Wrangler"));
    }

    #[test]
    fn detail_escapes_stored_text() {
        let html = build_vehicle_detail(&vehicle()).unwrap();
        assert!(html.contains("41,205"));
        assert!(!html.contains("<b>ultimate</b>"));
    }

    #[test]
    fn select_marks_submitted_classification() {
        let html = build_classification_select(
            &[
                Classification { classification_id: 1, classification_name: "Custom".into() },
                Classification { classification_id: 2, classification_name: "Sedan".into() },
            ],
            Some(2),
        )
        .unwrap();
        assert!(html.contains(r#"value="2" selected"#));
        assert!(!html.contains(r#"value="1" selected"#));
    }
}
