//! Checkout session construction and manifest handling.
//!
//! The cart is never persisted before payment, so the gateway session itself
//! carries everything confirmation later needs: the line-item manifest and
//! the customer form, serialized into session metadata. These functions are
//! pure so the money math and the manifest round-trip can be tested without
//! a gateway.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

use gilsenan_core::cart::CartItem;
use gilsenan_core::{MoneyError, to_minor_units};

use crate::config::CheckoutConfig;
use crate::models::CustomerDetails;

/// Metadata key under which the cart manifest is stored on the session.
pub const METADATA_ITEMS_KEY: &str = "items";

/// Metadata key under which the customer form is stored on the session.
pub const METADATA_CUSTOMER_KEY: &str = "customer";

/// Description line shown on the gateway's hosted page for every CD.
const LINE_ITEM_DESCRIPTION: &str = "Irish Music CD from Gilsenan Records";

/// Errors building or decoding a checkout manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// A price could not be expressed in minor units.
    #[error("invalid amount: {0}")]
    Amount(#[from] MoneyError),

    /// Manifest (de)serialization failed.
    #[error("manifest encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The retrieved session carries no cart manifest.
    #[error("session metadata has no cart manifest")]
    MissingManifest,
}

/// Validate client-submitted order lines before any transaction is opened.
///
/// Both order paths call this first: an empty cart and a zero-quantity line
/// are client errors, not database constraint violations.
///
/// # Errors
///
/// Returns a human-readable message for the first invalid line.
pub fn validate_order_items(items: &[CartItem]) -> Result<(), String> {
    if items.is_empty() {
        return Err("no items provided".to_string());
    }
    for line in items {
        if line.quantity == 0 {
            return Err(format!(
                "quantity must be at least 1 for product {}",
                line.id
            ));
        }
    }
    Ok(())
}

/// Build the form-encoded parameter list for a Stripe Checkout Session.
///
/// One `line_items[i]` block per cart line, a fixed-amount shipping rate,
/// the customer's email for the gateway receipt, and the serialized cart
/// and customer form as metadata for later retrieval by confirmation.
///
/// # Errors
///
/// Returns `ManifestError` if an amount is negative/overflows or the
/// metadata cannot be serialized.
pub fn build_session_form(
    items: &[CartItem],
    customer: &CustomerDetails,
    checkout: &CheckoutConfig,
    base_url: &str,
) -> Result<Vec<(String, String)>, ManifestError> {
    let base_url = base_url.trim_end_matches('/');
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[0]".into(), "card".into()),
    ];

    for (i, line) in items.iter().enumerate() {
        let unit_amount = to_minor_units(line.price)?;
        form.push((
            format!("line_items[{i}][price_data][currency]"),
            checkout.currency.clone(),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            format!("{} - {}", line.title, line.artist),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][description]"),
            LINE_ITEM_DESCRIPTION.into(),
        ));
        form.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            unit_amount.to_string(),
        ));
        form.push((format!("line_items[{i}][quantity]"), line.quantity.to_string()));
    }

    let shipping_amount = to_minor_units(checkout.shipping_amount)?;
    form.extend([
        (
            "shipping_options[0][shipping_rate_data][type]".into(),
            "fixed_amount".into(),
        ),
        (
            "shipping_options[0][shipping_rate_data][fixed_amount][amount]".into(),
            shipping_amount.to_string(),
        ),
        (
            "shipping_options[0][shipping_rate_data][fixed_amount][currency]".into(),
            checkout.currency.clone(),
        ),
        (
            "shipping_options[0][shipping_rate_data][display_name]".into(),
            "Standard Shipping".into(),
        ),
        (
            "shipping_options[0][shipping_rate_data][delivery_estimate][minimum][unit]".into(),
            "business_day".into(),
        ),
        (
            "shipping_options[0][shipping_rate_data][delivery_estimate][minimum][value]".into(),
            "3".into(),
        ),
        (
            "shipping_options[0][shipping_rate_data][delivery_estimate][maximum][unit]".into(),
            "business_day".into(),
        ),
        (
            "shipping_options[0][shipping_rate_data][delivery_estimate][maximum][value]".into(),
            "7".into(),
        ),
    ]);

    form.push(("customer_email".into(), customer.email.clone()));
    form.push((
        format!("metadata[{METADATA_ITEMS_KEY}]"),
        serde_json::to_string(items)?,
    ));
    form.push((
        format!("metadata[{METADATA_CUSTOMER_KEY}]"),
        serde_json::to_string(customer)?,
    ));
    form.push((
        "success_url".into(),
        format!("{base_url}/order-success?session_id={{CHECKOUT_SESSION_ID}}"),
    ));
    form.push(("cancel_url".into(), format!("{base_url}/cart")));

    Ok(form)
}

/// Decode the cart manifest back out of session metadata.
///
/// # Errors
///
/// Returns `ManifestError::MissingManifest` if the key is absent, or
/// `ManifestError::Encoding` if it does not parse.
pub fn decode_items_metadata(
    metadata: &HashMap<String, String>,
) -> Result<Vec<CartItem>, ManifestError> {
    let raw = metadata
        .get(METADATA_ITEMS_KEY)
        .ok_or(ManifestError::MissingManifest)?;
    Ok(serde_json::from_str(raw)?)
}

/// Decode the customer form out of session metadata, if present.
///
/// Older sessions may predate the metadata format; confirmation falls back
/// to a gateway-derived shipping block in that case, so absence is not an
/// error here.
#[must_use]
pub fn decode_customer_metadata(metadata: &HashMap<String, String>) -> Option<CustomerDetails> {
    let raw = metadata.get(METADATA_CUSTOMER_KEY)?;
    serde_json::from_str(raw).ok()
}

/// Recompute a direct order's total server-side: item sum plus shipping.
#[must_use]
pub fn direct_order_total(items: &[CartItem], checkout: &CheckoutConfig) -> Decimal {
    let subtotal: Decimal = items
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum();
    subtotal + checkout.shipping_amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use gilsenan_core::ProductId;
    use rust_decimal_macros::dec;

    fn checkout_config() -> CheckoutConfig {
        CheckoutConfig {
            currency: "eur".to_string(),
            shipping_amount: dec!(5.00),
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            first_name: "Aoife".to_string(),
            last_name: "Byrne".to_string(),
            email: "aoife@example.ie".to_string(),
            address: "4 Market Square".to_string(),
            city: "Kells".to_string(),
            postcode: "A82 XY12".to_string(),
            country: "Ireland".to_string(),
            phone: None,
        }
    }

    fn cart() -> Vec<CartItem> {
        vec![
            CartItem {
                id: ProductId::new(1),
                title: "Wexford Melodies".to_string(),
                artist: "Coastal Irish Band".to_string(),
                price: dec!(17.50),
                quantity: 1,
                image_url: None,
            },
            CartItem {
                id: ProductId::new(2),
                title: "Songs of Kells".to_string(),
                artist: "Meath Traditional Ensemble".to_string(),
                price: dec!(19.99),
                quantity: 2,
                image_url: None,
            },
        ]
    }

    fn value_of<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_form_line_items_in_minor_units() {
        let form = build_session_form(&cart(), &customer(), &checkout_config(), "https://shop.test")
            .expect("build form");

        assert_eq!(
            value_of(&form, "line_items[0][price_data][unit_amount]"),
            Some("1750")
        );
        assert_eq!(value_of(&form, "line_items[0][quantity]"), Some("1"));
        assert_eq!(
            value_of(&form, "line_items[1][price_data][unit_amount]"),
            Some("1999")
        );
        assert_eq!(value_of(&form, "line_items[1][quantity]"), Some("2"));
        assert_eq!(
            value_of(&form, "line_items[0][price_data][product_data][name]"),
            Some("Wexford Melodies - Coastal Irish Band")
        );
    }

    #[test]
    fn test_form_shipping_and_redirects() {
        let form = build_session_form(&cart(), &customer(), &checkout_config(), "https://shop.test/")
            .expect("build form");

        assert_eq!(
            value_of(
                &form,
                "shipping_options[0][shipping_rate_data][fixed_amount][amount]"
            ),
            Some("500")
        );
        assert_eq!(
            value_of(&form, "success_url"),
            Some("https://shop.test/order-success?session_id={CHECKOUT_SESSION_ID}")
        );
        assert_eq!(value_of(&form, "cancel_url"), Some("https://shop.test/cart"));
        assert_eq!(value_of(&form, "customer_email"), Some("aoife@example.ie"));
    }

    #[test]
    fn test_manifest_survives_metadata_roundtrip() {
        let items = cart();
        let form =
            build_session_form(&items, &customer(), &checkout_config(), "https://shop.test")
                .expect("build form");

        // Simulate the gateway echoing metadata back on retrieval.
        let mut metadata = HashMap::new();
        metadata.insert(
            METADATA_ITEMS_KEY.to_string(),
            value_of(&form, "metadata[items]").expect("items metadata").to_string(),
        );
        metadata.insert(
            METADATA_CUSTOMER_KEY.to_string(),
            value_of(&form, "metadata[customer]")
                .expect("customer metadata")
                .to_string(),
        );

        let decoded = decode_items_metadata(&metadata).expect("decode items");
        assert_eq!(decoded, items);

        let decoded_customer = decode_customer_metadata(&metadata).expect("decode customer");
        assert_eq!(decoded_customer.email, "aoife@example.ie");
    }

    #[test]
    fn test_decode_missing_manifest() {
        let metadata = HashMap::new();
        assert!(matches!(
            decode_items_metadata(&metadata),
            Err(ManifestError::MissingManifest)
        ));
    }

    #[test]
    fn test_validate_order_items_ok() {
        assert!(validate_order_items(&cart()).is_ok());
    }

    #[test]
    fn test_validate_order_items_rejects_empty_cart() {
        assert!(validate_order_items(&[]).is_err());
    }

    #[test]
    fn test_validate_order_items_rejects_zero_quantity_line() {
        let mut items = cart();
        items[1].quantity = 0;
        let message = validate_order_items(&items).expect_err("zero quantity");
        assert!(message.contains("product 2"));
    }

    #[test]
    fn test_direct_order_total() {
        // 17.50 + 2 x 19.99 + 5.00 shipping = 62.48
        assert_eq!(direct_order_total(&cart(), &checkout_config()), dec!(62.48));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut items = cart();
        items[0].price = dec!(-1.00);
        let result = build_session_form(&items, &customer(), &checkout_config(), "https://shop.test");
        assert!(matches!(result, Err(ManifestError::Amount(_))));
    }
}
