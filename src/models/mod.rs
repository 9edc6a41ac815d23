use serde::{Deserialize, Serialize};

/// One fully assembled apartment listing.
///
/// Created zero-valued for each input URL and filled in field by field as
/// page fragments are dispatched. Every field except `id` keeps its zero
/// default when the page does not carry it; the model has no optional
/// representation, so 0 also means "not found on the page".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Apartment {
    #[serde(rename = "ID")]
    pub id: i64,
    pub address: String,
    pub floor: f64,
    pub area: i32,
    pub rooms: f64,
    pub price: i64,
    pub estimated_value: i64,
    pub fee: i64,
    #[serde(rename = "ImageURLs")]
    pub image_urls: Vec<String>,
}

impl Apartment {
    /// A zero-valued listing carrying only its id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            address: String::new(),
            floor: 0.0,
            area: 0,
            rooms: 0.0,
            price: 0,
            estimated_value: 0,
            fee: 0,
            image_urls: Vec::new(),
        }
    }
}
