//! # Pricing Rules
//!
//! Cart-wide multi-item discount and delivery fee.
//!
//! ## The Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total_item_count = Σ quantity                                          │
//! │                                                                         │
//! │  total_item_count ≤ 1          total_item_count > 1                     │
//! │  ──────────────────            ─────────────────────────────────────    │
//! │  unit price as listed          unit price − 2.00 (every unit, every    │
//! │  free delivery                 line), plus 2.00 delivery, once         │
//! │                                                                         │
//! │  Example:  15.00 alone                      → 15.00                     │
//! │            15.00 + 10.00  → 13.00 + 8.00 + 2.00 → 23.00                │
//! │            15.00 × 2      → 13.00 × 2 + 2.00    → 28.00                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The threshold counts units across the whole cart, so a second unit of the
//! SAME product already triggers the discount and the fee. Effective unit
//! prices are not floored at zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::CartLineItem;

// =============================================================================
// Pricing Policy
// =============================================================================

/// Parameters of the multi-item rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingPolicy {
    /// Discount and fee apply when the unit count is ABOVE this.
    pub multi_item_threshold: u32,

    /// Subtracted from every unit's catalog price.
    pub unit_discount: Money,

    /// Added once to the grand total.
    pub delivery_fee: Money,
}

impl Default for PricingPolicy {
    /// Storefront rule: more than one unit → 2.00 off each, 2.00 delivery.
    fn default() -> Self {
        PricingPolicy {
            multi_item_threshold: 1,
            unit_discount: Money::from_units(2),
            delivery_fee: Money::from_units(2),
        }
    }
}

impl PricingPolicy {
    /// Whether a cart holding `total_item_count` units gets the discount
    /// and pays delivery.
    #[inline]
    pub fn applies(&self, total_item_count: u64) -> bool {
        total_item_count > u64::from(self.multi_item_threshold)
    }

    /// Price charged per unit of `item`.
    pub fn effective_unit_price(&self, item: &CartLineItem, applied: bool) -> Money {
        let listed = item.unit_price_money();
        if applied {
            listed - self.unit_discount
        } else {
            listed
        }
    }

    /// Effective unit price × quantity.
    pub fn line_total(&self, item: &CartLineItem, applied: bool) -> Money {
        self.effective_unit_price(item, applied) * item.quantity
    }

    /// Computes totals for `items`. Never cached: call it again after
    /// every mutation.
    pub fn totals(&self, items: &[CartLineItem]) -> CartTotals {
        let total_item_count: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
        let applied = self.applies(total_item_count);

        let subtotal: Money = items.iter().map(CartLineItem::undiscounted_total).sum();
        let discounted: Money = items.iter().map(|i| self.line_total(i, applied)).sum();
        let delivery_fee = if applied {
            self.delivery_fee
        } else {
            Money::zero()
        };

        CartTotals {
            total_item_count,
            line_count: items.len(),
            subtotal,
            discount: subtotal - discounted,
            delivery_fee,
            total_price: discounted + delivery_fee,
            multi_item_applied: applied,
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived cart figures. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Σ quantity. Drives the navbar badge and the multi-item rule.
    #[ts(type = "number")]
    pub total_item_count: u64,

    /// Number of distinct lines.
    #[ts(type = "number")]
    pub line_count: usize,

    /// Σ catalog price × quantity.
    pub subtotal: Money,

    /// Total discount granted (subtotal − discounted lines).
    pub discount: Money,

    /// Delivery fee charged, zero when free.
    pub delivery_fee: Money,

    /// What the customer pays.
    pub total_price: Money,

    /// Whether the multi-item rule kicked in.
    pub multi_item_applied: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemSpec;

    fn line(product_id: &str, price: &str, quantity: u32) -> CartLineItem {
        CartLineItem::from_spec(
            ItemSpec {
                product_id: product_id.to_string(),
                color_name: "أسود".to_string(),
                unit_price: price.to_string(),
                ..ItemSpec::default()
            },
            quantity,
        )
    }

    #[test]
    fn test_single_item_has_no_discount_or_fee() {
        let totals = PricingPolicy::default().totals(&[line("product1", "15.00 د.أ", 1)]);

        assert_eq!(totals.total_item_count, 1);
        assert_eq!(totals.total_price.cents(), 1500);
        assert!(totals.delivery_fee.is_zero());
        assert!(totals.discount.is_zero());
        assert!(!totals.multi_item_applied);
    }

    #[test]
    fn test_two_distinct_items() {
        let items = [
            line("product1", "15.00 د.أ", 1),
            line("product9", "10.00 د.أ", 1),
        ];
        let policy = PricingPolicy::default();
        let totals = policy.totals(&items);

        assert_eq!(totals.total_item_count, 2);
        assert_eq!(policy.effective_unit_price(&items[0], true).cents(), 1300);
        assert_eq!(policy.effective_unit_price(&items[1], true).cents(), 800);
        assert_eq!(totals.delivery_fee.cents(), 200);
        assert_eq!(totals.total_price.cents(), 2300);
        assert_eq!(totals.subtotal.cents(), 2500);
        assert_eq!(totals.discount.cents(), 400);
    }

    #[test]
    fn test_second_unit_of_same_product_triggers_rule() {
        let totals = PricingPolicy::default().totals(&[line("product1", "15.00 د.أ", 2)]);

        assert!(totals.multi_item_applied);
        // (15 - 2) × 2 + 2
        assert_eq!(totals.total_price.cents(), 2800);
    }

    #[test]
    fn test_empty_cart() {
        let totals = PricingPolicy::default().totals(&[]);
        assert_eq!(totals, CartTotals::default());
    }

    #[test]
    fn test_effective_price_can_go_negative() {
        let totals = PricingPolicy::default().totals(&[
            line("product1", "1.00", 1),
            line("product2", "1.00", 1),
        ]);
        // (1 - 2) × 2 + 2 = 0
        assert_eq!(totals.total_price.cents(), 0);
    }

    #[test]
    fn test_absurd_stored_prices_saturate() {
        let totals = PricingPolicy::default().totals(&[
            line("product1", "99999999999999999999", 1),
            line("product2", "123456789012345678901234", 3),
        ]);
        assert!(totals.multi_item_applied);
        assert_eq!(totals.subtotal.cents(), i64::MAX);
        assert_eq!(totals.total_price.cents(), i64::MAX);
    }

    #[test]
    fn test_custom_threshold() {
        let policy = PricingPolicy {
            multi_item_threshold: 2,
            ..PricingPolicy::default()
        };
        assert!(!policy.applies(2));
        assert!(policy.applies(3));
    }
}
