//! Sort keys accepted by the classification listing.

/// One column ordering the listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "name_asc" => Some(Self::NameAsc),
            "name_desc" => Some(Self::NameDesc),
            _ => None,
        }
    }

    /// ORDER BY terms for this key. "Name" is make, then model.
    pub fn order_terms(self) -> &'static str {
        match self {
            Self::PriceAsc => "inv_price ASC",
            Self::PriceDesc => "inv_price DESC",
            Self::NameAsc => "inv_make ASC, inv_model ASC",
            Self::NameDesc => "inv_make DESC, inv_model DESC",
        }
    }
}

/// Resolve the raw `sort` values, in the order given. Values may also be comma
/// separated. Unknown values and repeats are dropped; with nothing valid left
/// the listing falls back to name ascending.
pub fn resolve(raw: &[String]) -> Vec<SortKey> {
    let mut keys = Vec::new();
    for key in raw.iter().flat_map(|v| v.split(',')).filter_map(SortKey::parse) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        keys.push(SortKey::NameAsc);
    }
    keys
}

/// Comma-joined ORDER BY clause body for `keys`.
pub fn order_by(keys: &[SortKey]) -> String {
    keys.iter()
        .map(|k| k.order_terms())
        .collect::<Vec<_>>()
        .join(", ")
}
