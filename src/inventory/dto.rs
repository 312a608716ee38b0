use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SortParams {
    pub sort: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassificationForm {
    pub classification_name: String,
}

/// Add-vehicle form body. Kept as raw strings so a rejected submission can be
/// echoed back exactly as typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryForm {
    pub classification_id: String,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: String,
    pub inv_miles: String,
    pub inv_color: String,
}
