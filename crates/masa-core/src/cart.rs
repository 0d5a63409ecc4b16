//! # Cart
//!
//! The pure cart state machine: merge, remove, update, clear.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_item(spec)                                                         │
//! │     key exists? ── yes ──► quantity += 1   (other fields untouched)     │
//! │          │                                                              │
//! │          no ─────────────► push(spec, quantity = 1)                     │
//! │                                                                         │
//! │  update_quantity(key, n)                                                │
//! │     n < 1 ──────────────► remove_item(key)                              │
//! │     else ───────────────► items[key].quantity = n   (no-op if absent)   │
//! │                                                                         │
//! │  remove_item(key) ──────► retain(!key)             (no-op if absent)    │
//! │                                                                         │
//! │  clear() ───────────────► items = []                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here fails. The cart accepts whatever spec it is given; the
//! product page validates size selection before calling `add_item`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::{CartTotals, PricingPolicy};
use crate::types::{CartLineItem, ItemSpec, LineKey};

/// Result of [`Cart::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", tag = "kind")]
#[ts(export)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Inserted,
    /// An existing line was bumped to `quantity`.
    Merged { quantity: u32 },
}

/// An ordered list of line items, unique by [`LineKey`].
///
/// Order is insertion order. It matters for display only.
///
/// Serializes as a bare JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from rehydrated items.
    ///
    /// ## Normalization
    /// Stored data may have been written by an older build or edited by
    /// hand, so the invariants are re-established here:
    /// - lines with quantity 0 are dropped
    /// - lines sharing a key collapse into the first, quantities summed
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items.into_iter().filter(|i| i.quantity >= 1) {
            let key = item.key();
            match cart.items.iter_mut().find(|i| key.matches(i)) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Adds one unit of `spec`.
    ///
    /// ## Behavior
    /// - Same `(product_id, color_name, size)` already present: quantity + 1.
    ///   The stored snapshot (image, size guidance, price) is kept as-is.
    /// - Otherwise: appended with quantity 1.
    pub fn add_item(&mut self, spec: ItemSpec) -> AddOutcome {
        let key = spec.key();
        if let Some(item) = self.items.iter_mut().find(|i| key.matches(i)) {
            item.quantity = item.quantity.saturating_add(1);
            return AddOutcome::Merged {
                quantity: item.quantity,
            };
        }

        self.items.push(CartLineItem::from_spec(spec, 1));
        AddOutcome::Inserted
    }

    /// Removes the line with `key`. Returns whether anything was removed.
    pub fn remove_item(&mut self, key: &LineKey) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| !key.matches(i));
        self.items.len() != initial_len
    }

    /// Sets the quantity of the line with `key`.
    ///
    /// ## Behavior
    /// - `quantity < 1`: same as [`Cart::remove_item`]
    /// - line absent: no-op
    /// - above `u32::MAX`: clamped
    ///
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove_item(key);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|i| key.matches(i)) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the line with `key`, if any.
    pub fn get(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|i| key.matches(i))
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consumes the cart, returning its items.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ quantity.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Totals under `policy`, recomputed on every call.
    pub fn totals(&self, policy: &PricingPolicy) -> CartTotals {
        policy.totals(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(product_id: &str, color: &str, size: &str, price: &str) -> ItemSpec {
        ItemSpec {
            product_id: product_id.to_string(),
            product_name: format!("Product {product_id}"),
            internal_name: format!("Stock {product_id}"),
            color_name: color.to_string(),
            color_hex: "#000000".to_string(),
            size: size.to_string(),
            size_dimensions: None,
            unit_price: price.to_string(),
            image: format!("/products/{product_id}/{color}.png"),
        }
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add_item(spec("product1", "كحلي", "2", "15.00 د.أ"));
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_add_outcome() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_item(spec("product1", "كحلي", "2", "15.00 د.أ")),
            AddOutcome::Inserted
        );
        assert_eq!(
            cart.add_item(spec("product1", "كحلي", "2", "15.00 د.أ")),
            AddOutcome::Merged { quantity: 2 }
        );
    }

    #[test]
    fn test_merge_keeps_original_snapshot() {
        let mut cart = Cart::new();
        let mut first = spec("product1", "كحلي", "2", "15.00 د.أ");
        first.size_dimensions = Some("80-100".to_string());
        cart.add_item(first);

        let mut second = spec("product1", "كحلي", "2", "99.00 د.أ");
        second.image = "/other.png".to_string();
        second.size_dimensions = None;
        cart.add_item(second);

        let item = &cart.items()[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, "15.00 د.أ");
        assert_eq!(item.image, "/products/product1/كحلي.png");
        assert_eq!(item.size_dimensions.as_deref(), Some("80-100"));
    }

    #[test]
    fn test_different_color_or_size_is_new_line() {
        let mut cart = Cart::new();
        cart.add_item(spec("product1", "كحلي", "2", "15.00 د.أ"));
        cart.add_item(spec("product1", "أسود", "2", "15.00 د.أ"));
        cart.add_item(spec("product1", "كحلي", "3", "15.00 د.أ"));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.items()[1].color_name, "أسود");
    }

    #[test]
    fn test_add_then_remove_is_empty() {
        let mut cart = Cart::new();
        let s = spec("product2", "بيج", "", "17.00 د.أ");
        let key = s.key();
        cart.add_item(s);

        assert!(cart.remove_item(&key));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(spec("product2", "بيج", "", "17.00 د.أ"));

        assert!(!cart.remove_item(&LineKey::new("product2", "رمادي", "")));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_below_one_removes() {
        for quantity in [0, -1, i64::MIN] {
            let mut cart = Cart::new();
            let s = spec("product1", "كحلي", "1", "15.00 د.أ");
            let key = s.key();
            cart.add_item(s);

            assert!(cart.update_quantity(&key, quantity));
            assert!(cart.is_empty(), "quantity {quantity} should remove");
        }
    }

    #[test]
    fn test_update_overwrites_quantity() {
        let mut cart = Cart::new();
        let s = spec("product1", "كحلي", "1", "15.00 د.أ");
        let key = s.key();
        cart.add_item(s);

        assert!(cart.update_quantity(&key, 4));
        assert_eq!(cart.get(&key).map(|i| i.quantity), Some(4));
        assert!(!cart.update_quantity(&key, 4));
        assert!(!cart.update_quantity(&LineKey::new("nope", "", ""), 3));
    }

    #[test]
    fn test_update_clamps_huge_quantity() {
        let mut cart = Cart::new();
        let s = spec("product1", "كحلي", "1", "15.00 د.أ");
        let key = s.key();
        cart.add_item(s);

        cart.update_quantity(&key, i64::MAX);
        assert_eq!(cart.get(&key).map(|i| i.quantity), Some(u32::MAX));
    }

    #[test]
    fn test_from_items_normalizes() {
        let a = CartLineItem::from_spec(spec("product1", "كحلي", "1", "15.00 د.أ"), 1);
        let b = CartLineItem::from_spec(spec("product3", "أسود", "2", "15.00 د.أ"), 0);
        let c = CartLineItem::from_spec(spec("product1", "كحلي", "1", "15.00 د.أ"), 2);

        let cart = Cart::from_items(vec![a, b, c]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add_item(spec("product1", "كحلي", "1", "15.00 د.أ"));

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["productId"], "product1");
    }

    #[test]
    fn test_totals_follow_mutations() {
        let policy = PricingPolicy::default();
        let mut cart = Cart::new();
        let a = spec("product1", "كحلي", "1", "15.00 د.أ");
        let b = spec("product9", "أسود", "", "10.00 د.أ");
        let b_key = b.key();

        cart.add_item(a);
        assert_eq!(cart.totals(&policy).total_price.cents(), 1500);

        cart.add_item(b);
        let totals = cart.totals(&policy);
        assert_eq!(totals.total_item_count, 2);
        assert_eq!(totals.total_price.cents(), 2300);

        cart.remove_item(&b_key);
        let totals = cart.totals(&policy);
        assert_eq!(totals.total_item_count, 1);
        assert_eq!(totals.total_price.cents(), 1500);
    }
}
