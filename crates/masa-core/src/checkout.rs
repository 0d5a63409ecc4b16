//! # Checkout Snapshot
//!
//! Everything the order handoff channel needs, frozen at the moment the
//! shopper submits the form.
//!
//! ## Handoff Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart + PricingPolicy + CustomerDetails                                 │
//! │                │                                                        │
//! │                ▼                                                        │
//! │        CheckoutSnapshot::build                                          │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  ┌──────────────────────────────────┐                                   │
//! │  │ lines: item, effective unit     │ ──► handoff channel builds the    │
//! │  │        price, line total        │     chat message and opens it     │
//! │  │ totals: count, fee, total       │                                   │
//! │  │ customer: name, phone, ...      │ ──► cart is cleared on success    │
//! │  └──────────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Composing the message text is the channel's job, not ours.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::pricing::{CartTotals, PricingPolicy};
use crate::types::CartLineItem;

/// Fields the shopper enters on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    /// Delivery region.
    pub governorate: String,
    pub address: String,
    #[serde(default)]
    pub notes: String,
}

/// One priced line of the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutLine {
    pub item: CartLineItem,
    /// Catalog price before the multi-item discount.
    pub listed_unit_price: Money,
    /// Price actually charged per unit.
    pub effective_unit_price: Money,
    /// `effective_unit_price × quantity`.
    pub line_total: Money,
}

/// Final cart contents, totals and customer details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutSnapshot {
    pub lines: Vec<CheckoutLine>,
    pub totals: CartTotals,
    pub customer: CustomerDetails,
}

impl CheckoutSnapshot {
    /// Prices every line of `cart` under `policy`.
    pub fn build(cart: &Cart, policy: &PricingPolicy, customer: CustomerDetails) -> Self {
        let totals = cart.totals(policy);
        let applied = totals.multi_item_applied;

        let lines = cart
            .items()
            .iter()
            .map(|item| CheckoutLine {
                item: item.clone(),
                listed_unit_price: item.unit_price_money(),
                effective_unit_price: policy.effective_unit_price(item, applied),
                line_total: policy.line_total(item, applied),
            })
            .collect();

        CheckoutSnapshot {
            lines,
            totals,
            customer,
        }
    }

    /// Checks if there is nothing to order.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ line totals. Equals `totals.total_price - totals.delivery_fee`.
    pub fn items_total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total).sum()
    }
}
