//! Product Model

use serde::{Deserialize, Serialize};

use crate::order::OrderLineItem;

/// Product entity as served by the catalog collaborator
///
/// `price` is an integer in the smallest currency unit. `is_active`
/// false means the product is out of stock and must not be orderable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub image: Option<String>,
    /// Category reference (backend sends `categoryId`)
    #[serde(default, rename = "categoryId")]
    pub category_id: Option<i64>,
    /// AR model available for this product
    #[serde(default, rename = "ar")]
    pub ar_enabled: bool,
    #[serde(default = "default_true", rename = "isActive")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Minimal constructor for catalog seeding and tests
    pub fn new(id: i64, name: impl Into<String>, price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            category_id: None,
            ar_enabled: false,
            is_active: true,
        }
    }

    /// Snapshot this product into an order line with the given count
    pub fn to_line_item(&self, qty: u32) -> OrderLineItem {
        OrderLineItem {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            qty,
            image: self.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"{"id":5,"name":"Nasi Katsu","price":13000,"categoryId":2,"ar":true,"isActive":false,"image":"katsu.png"}"#;
        let p: Product = serde_json::from_str(json).expect("valid product json");
        assert_eq!(p.id, 5);
        assert_eq!(p.price, 13000);
        assert_eq!(p.category_id, Some(2));
        assert!(p.ar_enabled);
        assert!(!p.is_active);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let p: Product = serde_json::from_str(r#"{"id":1,"name":"Teh Manis"}"#).expect("sparse json");
        assert_eq!(p.price, 0);
        assert!(p.is_active);
        assert!(!p.ar_enabled);
        assert_eq!(p.image, None);
    }
}
