//! Catalog decoder: raw bytes → `CatalogResponse`.

use crate::error::DecodeError;
use crate::model::CatalogResponse;

/// Decode a catalog payload.
///
/// Either the whole envelope decodes or a `DecodeError` is returned; callers
/// never see a partially populated response.
pub fn decode(bytes: &[u8]) -> Result<CatalogResponse, DecodeError> {
    if tracing::enabled!(tracing::Level::TRACE) {
        match serde_json::from_slice::<serde_json::Value>(bytes)
            .and_then(|v| serde_json::to_string_pretty(&v))
        {
            Ok(pretty) => tracing::trace!(payload = %pretty, "catalog payload"),
            Err(_) => tracing::trace!(
                payload = %String::from_utf8_lossy(bytes),
                "catalog payload (not valid JSON)"
            ),
        }
    }

    let response: CatalogResponse = serde_json::from_slice(bytes)?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Money, ProductId};

    const PAYLOAD: &str = r#"{
        "products": [
            {"id": 3, "name": "Pepperoni", "price": 650, "image": "pepperoni.png"},
            {"id": 1, "name": "Margherita", "description": "Tomato, mozzarella", "price": 500, "count": 2},
            {"id": 2, "name": "Cola", "price": 150}
        ],
        "categories": [{"id": 1, "title": "Pizza"}, {"id": 2, "title": "Drinks"}],
        "ingredients": [{"id": 10, "name": "Jalapeno", "price": 59}],
        "sizes": ["Small", "Medium", "Large"],
        "dough": ["Traditional", "Thin"]
    }"#;

    #[test]
    fn decodes_full_payload_preserving_order() {
        let response = decode(PAYLOAD.as_bytes()).unwrap();

        assert_eq!(response.products.len(), 3);
        let ids: Vec<i64> = response.products.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(response.categories.len(), 2);
        assert_eq!(response.ingredients[0].price, Money::new(59));
        assert_eq!(response.sizes.as_deref().map(<[String]>::len), Some(3));
        assert_eq!(response.dough.as_deref().map(<[String]>::len), Some(2));
    }

    #[test]
    fn count_defaults_to_zero() {
        let response = decode(PAYLOAD.as_bytes()).unwrap();
        let pepperoni = &response.products[0];
        assert_eq!(pepperoni.id, ProductId::new(3));
        assert_eq!(pepperoni.count, 0);
        assert_eq!(response.products[1].count, 2);
    }

    #[test]
    fn absent_sizes_and_dough_are_not_an_error() {
        let payload = br#"{"products": [], "categories": [], "ingredients": []}"#;
        let response = decode(payload).unwrap();
        assert!(response.sizes.is_none());
        assert!(response.dough.is_none());
    }

    #[test]
    fn product_needs_only_id_and_price() {
        let payload = br#"{"products":[{"id":1,"price":500}],"categories":[],"ingredients":[]}"#;
        let response = decode(payload).unwrap();

        let product = &response.products[0];
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Money::new(500));
        assert_eq!(product.count, 0);
        assert!(product.name.is_empty());
    }

    #[test]
    fn malformed_json_fails() {
        let err = decode(b"{\"products\": [").unwrap_err();
        assert!(!err.cause.is_empty());
        assert_eq!(err.line, 1);
    }

    #[test]
    fn schema_mismatch_fails() {
        // Missing `categories`.
        let missing = br#"{"products": [], "ingredients": []}"#;
        assert!(decode(missing).unwrap_err().cause.contains("categories"));

        // Negative price.
        let negative = br#"{"products": [{"id": 1, "name": "X", "price": -5}], "categories": [], "ingredients": []}"#;
        assert!(decode(negative).is_err());

        // Product without an id.
        let no_id = br#"{"products": [{"name": "X", "price": 5}], "categories": [], "ingredients": []}"#;
        assert!(decode(no_id).is_err());
    }

    #[test]
    fn invalid_utf8_fails() {
        assert!(decode(&[0xff, 0xfe, 0x00]).is_err());
        assert!(decode(b"").is_err());
    }
}
