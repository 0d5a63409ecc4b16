//! # Domain Types
//!
//! The cart's data model.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  add_item   ┌─────────────────┐                   │
//! │  │    ItemSpec     │ ──────────► │  CartLineItem   │                   │
//! │  │  ─────────────  │             │  ─────────────  │                   │
//! │  │  product_id     │             │  (ItemSpec)     │                   │
//! │  │  color_name     │             │  quantity ≥ 1   │                   │
//! │  │  size           │             └────────┬────────┘                   │
//! │  │  unit_price     │                      │ key()                      │
//! │  │  ...            │                      ▼                            │
//! │  └─────────────────┘             ┌─────────────────┐                   │
//! │                                  │     LineKey     │                   │
//! │                                  │ (product_id,    │                   │
//! │                                  │  color_name,    │                   │
//! │                                  │  size)          │                   │
//! │                                  └─────────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Every field except `quantity` is frozen when the item is first added:
//! display name, internal name, price string, image and size guidance are
//! copied out of the catalog and never re-derived.
//!
//! ## Persisted Layout
//! The serde names below ARE the local storage wire format
//! (`productId`, `nameItemInStorage`, `price`, ...). Renaming a field breaks
//! every cart already saved in a customer's browser.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item Spec
// =============================================================================

/// What a product page hands to the cart: one purchasable selection.
///
/// Missing fields deserialize as empty strings. The cart never validates a
/// spec; the product page checks size selection before calling `add_item`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ItemSpec {
    /// Catalog identifier, e.g. `"product1"`.
    pub product_id: String,

    /// Marketing name shown in the drawer.
    pub product_name: String,

    /// Name the warehouse knows the item by. Used in outbound order messages.
    #[serde(rename = "nameItemInStorage")]
    pub internal_name: String,

    /// Selected color label.
    pub color_name: String,

    /// Swatch color, e.g. `"#34364B"`.
    pub color_hex: String,

    /// Selected size label. Empty for unsized products.
    pub size: String,

    /// Size guidance text frozen from the catalog at add time.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub size_dimensions: Option<String>,

    /// Price exactly as the catalog displays it, e.g. `"15.00 د.أ"`.
    #[serde(rename = "price")]
    pub unit_price: String,

    /// Representative image for the selected color.
    pub image: String,
}

impl ItemSpec {
    /// Returns the identity key this spec would merge under.
    pub fn key(&self) -> LineKey {
        LineKey::new(&self.product_id, &self.color_name, &self.size)
    }

    /// Returns the catalog price parsed through the single price parser.
    #[inline]
    pub fn unit_price_money(&self) -> Money {
        Money::parse_display(&self.unit_price)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One entry in the cart.
///
/// ## Invariants
/// - `quantity >= 1` whenever the item is inside a `Cart`
/// - no two items in a cart share a [`LineKey`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CartLineItem {
    pub product_id: String,
    pub product_name: String,
    #[serde(rename = "nameItemInStorage")]
    pub internal_name: String,
    pub color_name: String,
    pub color_hex: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub size_dimensions: Option<String>,
    #[serde(rename = "price")]
    pub unit_price: String,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Builds a line item from a spec with the given quantity.
    pub fn from_spec(spec: ItemSpec, quantity: u32) -> Self {
        CartLineItem {
            product_id: spec.product_id,
            product_name: spec.product_name,
            internal_name: spec.internal_name,
            color_name: spec.color_name,
            color_hex: spec.color_hex,
            size: spec.size,
            size_dimensions: spec.size_dimensions,
            unit_price: spec.unit_price,
            image: spec.image,
            quantity,
        }
    }

    /// Returns the identity key of this line.
    pub fn key(&self) -> LineKey {
        LineKey::new(&self.product_id, &self.color_name, &self.size)
    }

    /// Returns the catalog price parsed through the single price parser.
    #[inline]
    pub fn unit_price_money(&self) -> Money {
        Money::parse_display(&self.unit_price)
    }

    /// Catalog price × quantity, before any cart-wide discount.
    pub fn undiscounted_total(&self) -> Money {
        self.unit_price_money() * self.quantity
    }
}

// =============================================================================
// Line Key
// =============================================================================

/// Identity of a line item: `(product_id, color_name, size)`.
///
/// Two additions with equal keys are the same line. Comparison is exact
/// string equality; `"M"` and `"m"` are different sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineKey {
    pub product_id: String,
    pub color_name: String,
    pub size: String,
}

impl LineKey {
    /// Creates a key from its three parts.
    pub fn new(
        product_id: impl Into<String>,
        color_name: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        LineKey {
            product_id: product_id.into(),
            color_name: color_name.into(),
            size: size.into(),
        }
    }

    /// Checks whether `item` has this key, without allocating.
    pub fn matches(&self, item: &CartLineItem) -> bool {
        item.product_id == self.product_id
            && item.color_name == self.color_name
            && item.size == self.size
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn abaya() -> ItemSpec {
        ItemSpec {
            product_id: "product1".to_string(),
            product_name: "عباية مخمل شتوي".to_string(),
            internal_name: "عباية مخمل ابو خط القديم".to_string(),
            color_name: "كحلي".to_string(),
            color_hex: "#34364B".to_string(),
            size: "2".to_string(),
            size_dimensions: Some("بيلبس من وزن 80 كيلو الى وزن 100".to_string()),
            unit_price: "15.00 د.أ".to_string(),
            image: "/products/product_1/2.png".to_string(),
        }
    }

    #[test]
    fn test_persisted_field_names() {
        let item = CartLineItem::from_spec(abaya(), 2);
        let json = serde_json::to_value(&item).unwrap();

        for field in [
            "productId",
            "productName",
            "nameItemInStorage",
            "colorName",
            "colorHex",
            "size",
            "sizeDimensions",
            "price",
            "image",
            "quantity",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["price"], "15.00 د.أ");
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_size_dimensions_omitted_when_absent() {
        let mut spec = abaya();
        spec.size_dimensions = None;
        let json = serde_json::to_value(CartLineItem::from_spec(spec, 1)).unwrap();
        assert!(json.get("sizeDimensions").is_none());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let item: CartLineItem =
            serde_json::from_str(r#"{"productId":"product2","quantity":1}"#).unwrap();
        assert_eq!(item.product_id, "product2");
        assert_eq!(item.size, "");
        assert_eq!(item.size_dimensions, None);
        assert!(item.unit_price_money().is_zero());
    }

    #[test]
    fn test_key_matches_all_three_parts() {
        let item = CartLineItem::from_spec(abaya(), 1);
        assert!(item.key().matches(&item));
        assert!(!LineKey::new("product1", "كحلي", "3").matches(&item));
        assert!(!LineKey::new("product1", "أسود", "2").matches(&item));
        assert!(!LineKey::new("product3", "كحلي", "2").matches(&item));
    }

    #[test]
    fn test_undiscounted_total() {
        let item = CartLineItem::from_spec(abaya(), 3);
        assert_eq!(item.undiscounted_total().cents(), 4500);
    }
}
