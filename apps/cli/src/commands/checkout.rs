//! # Checkout Command
//!
//! ```text
//! checkout form ──► validate ──► CheckoutSnapshot ──► OrderOutbox ──► clear cart
//!                       │                                  │
//!                       └── VALIDATION_ERROR               └── HANDOFF_ERROR (cart kept)
//! ```

use std::path::PathBuf;

use masa_core::{CheckoutSnapshot, CustomerDetails, TrackedEvent};
use serde::Serialize;
use tracing::debug;

use crate::cli::CheckoutArgs;
use crate::error::ApiError;
use crate::handoff::OrderOutbox;
use crate::state::AppState;

/// What was ordered and where it was recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order: CheckoutSnapshot,
    pub total_display: String,
    /// InitiateCheckout payload, captured before the handoff.
    pub initiate_event: TrackedEvent,
    /// Purchase payload.
    pub purchase_event: TrackedEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_file: Option<PathBuf>,
}

impl From<&CheckoutArgs> for CustomerDetails {
    fn from(form: &CheckoutArgs) -> Self {
        CustomerDetails {
            name: form.name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            governorate: form.governorate.trim().to_string(),
            address: form.address.trim().to_string(),
            notes: form.notes.trim().to_string(),
        }
    }
}

/// Hands the cart off as an order and empties it.
pub fn checkout(state: &AppState, form: &CheckoutArgs) -> Result<CheckoutResponse, ApiError> {
    debug!(governorate = %form.governorate, "checkout command");

    let initiate_event = state.store.initiate_checkout();
    let outbox = OrderOutbox::new(state.orders_dir(), state.config().whatsapp_phone.clone());
    let receipt = state.store.checkout(CustomerDetails::from(form), &outbox)?;

    Ok(CheckoutResponse {
        total_display: state.config().format_money(receipt.snapshot.totals.total_price),
        order: receipt.snapshot,
        initiate_event,
        purchase_event: receipt.event,
        order_file: outbox.last_written(),
    })
}
