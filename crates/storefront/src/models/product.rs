//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gilsenan_core::ProductId;

/// A sellable CD in the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    /// Copies on hand. Never negative; decremented only by order flows.
    pub stock: i32,
    pub featured: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating or replacing a product (admin input).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewProduct {
    /// Validate admin-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.artist.trim().is_empty() {
            return Err("artist is required".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("category is required".to_string());
        }
        if self.price.is_sign_negative() {
            return Err("price must not be negative".to_string());
        }
        if self.stock < 0 {
            return Err("stock must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fiddle_music() -> NewProduct {
        NewProduct {
            title: "Traditional Irish Fiddle Music".to_string(),
            artist: "Kevin Burke".to_string(),
            description: Some("Authentic fiddle tunes from County Sligo".to_string()),
            price: dec!(18.99),
            category: "Traditional".to_string(),
            stock: 5,
            featured: true,
            image_url: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(fiddle_music().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut product = fiddle_music();
        product.title = "   ".to_string();
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut product = fiddle_music();
        product.price = dec!(-1.00);
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_stock() {
        let mut product = fiddle_music();
        product.stock = -1;
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_new_product_deserializes_camel_case() {
        let json = r#"{
            "title": "Celtic Folk Tales",
            "artist": "The Dubliners",
            "price": "16.99",
            "category": "Folk",
            "stock": 8,
            "imageUrl": "https://cdn.example.ie/folk.jpg"
        }"#;
        let product: NewProduct = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.title, "Celtic Folk Tales");
        assert!(!product.featured);
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example.ie/folk.jpg")
        );
    }
}
