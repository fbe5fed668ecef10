use serde::{Deserialize, Serialize};

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body accepted by both `POST /products` and `PUT /products/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    /// Client-chosen id. `None` and `Some(0)` both mean "let the store pick".
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

impl ProductInput {
    /// The explicitly requested id, with zero treated as omitted.
    pub fn requested_id(&self) -> Option<i32> {
        self.id.filter(|&id| id != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ProductInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn id_and_description_are_optional() {
        let input = parse(json!({ "name": "Mug", "price": 4.5, "quantity": 12 }));
        assert_eq!(input.id, None);
        assert_eq!(input.description, None);
        assert_eq!(input.requested_id(), None);
    }

    #[test]
    fn zero_id_counts_as_omitted() {
        let input = parse(json!({ "id": 0, "name": "Mug", "price": 4.5, "quantity": 12 }));
        assert_eq!(input.requested_id(), None);
    }

    #[test]
    fn null_id_counts_as_omitted() {
        let input = parse(json!({ "id": null, "name": "Mug", "price": 4.5, "quantity": 12 }));
        assert_eq!(input.requested_id(), None);
    }

    #[test]
    fn explicit_id_is_kept() {
        let input = parse(json!({ "id": 42, "name": "Mug", "price": 4.5, "quantity": 12 }));
        assert_eq!(input.requested_id(), Some(42));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let res = serde_json::from_value::<ProductInput>(json!({ "name": "Mug", "price": 4.5 }));
        assert!(res.is_err(), "quantity is required");
    }

    #[test]
    fn product_serializes_with_flat_fields() {
        let p = Product {
            id: 1,
            name: "Phone".to_string(),
            description: Some("A smartphone".to_string()),
            price: 699.99,
            quantity: 50,
        };
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({
                "id": 1,
                "name": "Phone",
                "description": "A smartphone",
                "price": 699.99,
                "quantity": 50,
            })
        );
    }

    #[test]
    fn missing_description_serializes_as_null() {
        let p = Product {
            id: 7,
            name: "Crate".to_string(),
            description: None,
            price: 3.0,
            quantity: 0,
        };
        assert!(serde_json::to_value(&p).unwrap()["description"].is_null());
    }
}
