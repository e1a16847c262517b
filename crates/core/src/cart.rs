//! Shopping cart state and reducers.
//!
//! The cart is client-resident state: it is never persisted server-side and
//! only reaches the server as the line-item payload of a checkout request.
//! It is modeled here as a serializable value type with pure reducer
//! methods, so the four operations can be unit tested without any UI or
//! session harness.
//!
//! Aggregates (`item_count`, `total`) are derived, never settable: every
//! reducer recomputes them from the current lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One line in the shopper's cart.
///
/// `price` is a display snapshot taken when the product was added; the
/// authoritative price at purchase time is re-read from the catalog by the
/// checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog product this line refers to.
    pub id: ProductId,
    /// Product title at the time of adding.
    pub title: String,
    /// Recording artist at the time of adding.
    pub artist: String,
    /// Unit price snapshot.
    pub price: Decimal,
    /// Number of copies.
    pub quantity: u32,
    /// Optional cover image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A product as seen by the cart when adding a line.
///
/// Decouples the reducer from the full catalog model: callers supply only
/// the display fields a cart line snapshots.
#[derive(Debug, Clone)]
pub struct CartProduct {
    pub id: ProductId,
    pub title: String,
    pub artist: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// The whole cart: lines plus derived aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Current lines, in insertion order.
    pub items: Vec<CartItem>,
    /// Derived: sum of line quantities.
    pub item_count: u32,
    /// Derived: sum of quantity x price over all lines.
    pub total: Decimal,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of a product.
    ///
    /// If a line for this product already exists its quantity is
    /// incremented; otherwise a new line with quantity 1 is appended.
    #[must_use]
    pub fn add(mut self, product: &CartProduct) -> Self {
        match self.items.iter_mut().find(|line| line.id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.items.push(CartItem {
                id: product.id,
                title: product.title.clone(),
                artist: product.artist.clone(),
                price: product.price,
                quantity: 1,
                image_url: product.image_url.clone(),
            }),
        }
        self.recompute()
    }

    /// Set a line's quantity to an exact value.
    ///
    /// A quantity of zero removes the line entirely. Unknown product ids
    /// are ignored.
    #[must_use]
    pub fn update_quantity(mut self, id: ProductId, quantity: u32) -> Self {
        if quantity == 0 {
            self.items.retain(|line| line.id != id);
        } else if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
        self.recompute()
    }

    /// Remove a line by product id.
    #[must_use]
    pub fn remove(mut self, id: ProductId) -> Self {
        self.items.retain(|line| line.id != id);
        self.recompute()
    }

    /// Empty the cart.
    #[must_use]
    pub fn clear(self) -> Self {
        Self::new()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recompute the derived aggregates from the current lines.
    fn recompute(mut self) -> Self {
        self.item_count = self.items.iter().map(|line| line.quantity).sum();
        self.total = self
            .items
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wexford() -> CartProduct {
        CartProduct {
            id: ProductId::new(1),
            title: "Wexford Melodies".to_string(),
            artist: "Coastal Irish Band".to_string(),
            price: dec!(17.50),
            image_url: None,
        }
    }

    fn kells() -> CartProduct {
        CartProduct {
            id: ProductId::new(2),
            title: "Songs of Kells".to_string(),
            artist: "Meath Traditional Ensemble".to_string(),
            price: dec!(19.99),
            image_url: Some("https://cdn.example.ie/kells.jpg".to_string()),
        }
    }

    /// Check the derived-aggregate invariant after any operation.
    fn assert_aggregates(cart: &CartState) {
        let count: u32 = cart.items.iter().map(|l| l.quantity).sum();
        let total: Decimal = cart
            .items
            .iter()
            .map(|l| l.price * Decimal::from(l.quantity))
            .sum();
        assert_eq!(cart.item_count, count);
        assert_eq!(cart.total, total);
    }

    #[test]
    fn test_empty_cart() {
        let cart = CartState::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count, 0);
        assert_eq!(cart.total, Decimal::ZERO);
    }

    #[test]
    fn test_add_same_product_twice_merges_lines() {
        let cart = CartState::new().add(&kells()).add(&kells());
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.total, dec!(39.98));
        assert_aggregates(&cart);
    }

    #[test]
    fn test_subtotal_scenario() {
        // 1 x 17.50 + 2 x 19.99 = 57.48
        let cart = CartState::new().add(&wexford()).add(&kells()).add(&kells());
        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.total, dec!(57.48));
        assert_aggregates(&cart);
    }

    #[test]
    fn test_update_quantity() {
        let cart = CartState::new()
            .add(&wexford())
            .update_quantity(ProductId::new(1), 4);
        assert_eq!(cart.items[0].quantity, 4);
        assert_eq!(cart.total, dec!(70.00));
        assert_aggregates(&cart);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let cart = CartState::new()
            .add(&wexford())
            .add(&kells())
            .update_quantity(ProductId::new(1), 0);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id, ProductId::new(2));
        assert_aggregates(&cart);
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let cart = CartState::new().add(&wexford());
        let updated = cart.clone().update_quantity(ProductId::new(99), 3);
        assert_eq!(updated, cart);
    }

    #[test]
    fn test_remove() {
        let cart = CartState::new()
            .add(&wexford())
            .add(&kells())
            .remove(ProductId::new(2));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, dec!(17.50));
        assert_aggregates(&cart);
    }

    #[test]
    fn test_clear() {
        let cart = CartState::new().add(&wexford()).add(&kells()).clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count, 0);
        assert_eq!(cart.total, Decimal::ZERO);
    }

    #[test]
    fn test_aggregates_hold_over_mixed_sequence() {
        let mut cart = CartState::new();
        for _ in 0..3 {
            cart = cart.add(&wexford());
            assert_aggregates(&cart);
        }
        cart = cart.add(&kells());
        assert_aggregates(&cart);
        cart = cart.update_quantity(ProductId::new(1), 1);
        assert_aggregates(&cart);
        cart = cart.remove(ProductId::new(2));
        assert_aggregates(&cart);
        assert_eq!(cart.item_count, 1);
        assert_eq!(cart.total, dec!(17.50));
    }

    #[test]
    fn test_serde_roundtrip_preserves_state() {
        let cart = CartState::new().add(&wexford()).add(&kells());
        let json = serde_json::to_string(&cart).expect("serialize");
        let back: CartState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
