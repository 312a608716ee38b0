use rust_decimal::Decimal;
use sqlx::FromRow;

/// Vehicle category.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Classification {
    pub classification_id: i32,
    pub classification_name: String,
}

/// Inventory row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Vehicle {
    pub inv_id: i32,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: i32,
    pub inv_description: String,
    pub inv_image: String,     // path under /images/vehicles/
    pub inv_thumbnail: String, // path under /images/vehicles/
    pub inv_price: Decimal,
    pub inv_miles: i32,
    pub inv_color: String,
    pub classification_id: i32,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.inv_make, self.inv_model)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub classification_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub description: String,
    pub image: String,
    pub thumbnail: String,
    pub price: Decimal,
    pub miles: i32,
    pub color: String,
}
