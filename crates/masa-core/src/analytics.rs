//! # Analytics Payloads
//!
//! Data the cart emits so a caller can report commerce events to the
//! browser pixel and the server-side conversion endpoint.
//!
//! ## Deduplication
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartStore::add_item ──► TrackedEvent { event_id: v4, AddToCart }       │
//! │                                │                                        │
//! │                 ┌──────────────┴──────────────┐                         │
//! │                 ▼                             ▼                         │
//! │          browser pixel                server-side conversion            │
//! │          (same event_id)              (same event_id)                   │
//! │                 └──────────────┬──────────────┘                         │
//! │                                ▼                                        │
//! │                  counted once by the ad platform                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No network calls happen here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checkout::CheckoutSnapshot;
use crate::money::Money;
use crate::pricing::CartTotals;
use crate::types::CartLineItem;

/// One product inside an event's `contents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLine {
    pub id: String,
    pub quantity: u32,
    /// Catalog price, before the multi-item discount.
    pub item_price: Money,
    pub item_name: String,
    pub item_variant: String,
}

impl From<&CartLineItem> for ContentLine {
    fn from(item: &CartLineItem) -> Self {
        ContentLine {
            id: item.product_id.clone(),
            quantity: item.quantity,
            item_price: item.unit_price_money(),
            item_name: item.internal_name.clone(),
            item_variant: item.color_name.clone(),
        }
    }
}

/// Commerce events the storefront reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum CommerceEvent {
    /// A line was added (or merged). `item` is the stored line after the add.
    AddToCart {
        item: CartLineItem,
        totals: CartTotals,
    },
    /// The cart was opened with intent to order.
    InitiateCheckout {
        contents: Vec<ContentLine>,
        totals: CartTotals,
    },
    /// The order was handed off.
    Purchase {
        contents: Vec<ContentLine>,
        totals: CartTotals,
    },
}

impl CommerceEvent {
    /// Standard event name used by the pixel.
    pub fn name(&self) -> &'static str {
        match self {
            CommerceEvent::AddToCart { .. } => "AddToCart",
            CommerceEvent::InitiateCheckout { .. } => "InitiateCheckout",
            CommerceEvent::Purchase { .. } => "Purchase",
        }
    }

    /// Reported monetary value.
    ///
    /// AddToCart reports one unit at catalog price; the checkout events
    /// report what the customer pays.
    pub fn value(&self) -> Money {
        match self {
            CommerceEvent::AddToCart { item, .. } => item.unit_price_money(),
            CommerceEvent::InitiateCheckout { totals, .. }
            | CommerceEvent::Purchase { totals, .. } => totals.total_price,
        }
    }

    /// Builds a Purchase event from a checkout snapshot.
    pub fn purchase(snapshot: &CheckoutSnapshot) -> Self {
        CommerceEvent::Purchase {
            contents: snapshot.lines.iter().map(|l| ContentLine::from(&l.item)).collect(),
            totals: snapshot.totals,
        }
    }

    /// Builds an InitiateCheckout event from the current lines.
    pub fn initiate_checkout(items: &[CartLineItem], totals: CartTotals) -> Self {
        CommerceEvent::InitiateCheckout {
            contents: items.iter().map(ContentLine::from).collect(),
            totals,
        }
    }
}

/// An event stamped with a dedup id and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// ISO 4217 code, e.g. `"JOD"`.
    pub currency: String,
    pub event: CommerceEvent,
}

impl TrackedEvent {
    /// Stamps `event` with a fresh v4 id and the current time.
    pub fn new(event: CommerceEvent, currency: impl Into<String>) -> Self {
        TrackedEvent {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            currency: currency.into(),
            event,
        }
    }
}
