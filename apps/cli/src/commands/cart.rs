//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐        │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │        │
//! │  │  Cart    │     │          │     │   Form   │     │ recorded │        │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘        │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                             │             │
//! │       │           update_cart_item                        │             │
//! │       │           remove_from_cart                        │             │
//! │       │                │                                  │             │
//! │       └────────── clear_cart ◄────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use masa_core::{
    AddOutcome, CartLineItem, CartTotals, ColorChoice, LineKey, Selection, TrackedEvent,
};
use masa_storage::badge_label;
use serde::Serialize;
use tracing::debug;

use crate::cli::LineArgs;
use crate::error::ApiError;
use crate::state::AppState;

/// Cart contents with totals, as the drawer shows them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub totals: CartTotals,
    /// Total formatted for display, e.g. `"23.00 د.أ"`.
    pub total_display: String,
    /// Navbar badge text.
    pub badge: String,
}

impl CartResponse {
    pub fn from_state(state: &AppState) -> Self {
        let items = state.store.items();
        let totals = state.store.totals();
        CartResponse {
            total_display: state.config().format_money(totals.total_price),
            badge: badge_label(totals.total_item_count),
            items,
            totals,
        }
    }
}

/// Result of adding an item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResponse {
    pub outcome: AddOutcome,
    pub item: CartLineItem,
    /// AddToCart payload for the pixel and conversion endpoint.
    pub event: TrackedEvent,
    pub cart: CartResponse,
}

/// Maps CLI line arguments onto a cart line key.
///
/// A numeric color is looked up in the catalog so `--color 0` and
/// `--color زيتي` address the same line. Unknown products fall back to the
/// arguments as given, so lines of discontinued products stay removable.
fn line_key(state: &AppState, line: &LineArgs) -> LineKey {
    let product = state.catalog.get(&line.product);
    let color = match (ColorChoice::parse(&line.color), product) {
        (ColorChoice::Index(index), Some(product)) => product
            .colors
            .get(index)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| line.color.clone()),
        _ => line.color.trim().to_string(),
    };
    let size = match product {
        Some(product) if !product.requires_size() => String::new(),
        _ => line.size.clone().unwrap_or_default(),
    };
    LineKey::new(&line.product, color, size)
}

/// Shows the current cart.
pub fn get_cart(state: &AppState) -> CartResponse {
    debug!("get_cart command");
    CartResponse::from_state(state)
}

/// Adds one unit of the selected variant.
///
/// ## Behavior
/// - Same product, color and size already in cart: quantity increases
/// - Otherwise: added as a new line with the catalog price frozen in
pub fn add_to_cart(
    state: &AppState,
    line: &LineArgs,
    image: Option<String>,
) -> Result<AddResponse, ApiError> {
    debug!(product_id = %line.product, color = %line.color, "add_to_cart command");

    let mut selection = Selection::new(&line.product, ColorChoice::parse(&line.color));
    selection.size = line.size.clone();
    selection.image_override = image;

    let spec = state.catalog.resolve(&selection)?;
    let receipt = state.store.add_item(spec);

    Ok(AddResponse {
        outcome: receipt.outcome,
        item: receipt.item,
        event: receipt.event,
        cart: CartResponse::from_state(state),
    })
}

/// Sets the quantity of a line. Zero or less removes it.
///
/// A line that is not in the cart is a no-op, not an error.
pub fn update_cart_item(
    state: &AppState,
    line: &LineArgs,
    quantity: i64,
) -> CartResponse {
    let key = line_key(state, line);
    debug!(product_id = %key.product_id, quantity, "update_cart_item command");

    if !state.store.update_quantity(&key, quantity) {
        debug!(line = %describe(&key), "Cart unchanged by update");
    }
    CartResponse::from_state(state)
}

/// Removes a line. Removing a line that is not there is a no-op.
pub fn remove_from_cart(state: &AppState, line: &LineArgs) -> CartResponse {
    let key = line_key(state, line);
    debug!(product_id = %key.product_id, "remove_from_cart command");

    if !state.store.remove_item(&key) {
        debug!(line = %describe(&key), "No such cart line to remove");
    }
    CartResponse::from_state(state)
}

/// Empties the cart.
pub fn clear_cart(state: &AppState) -> CartResponse {
    debug!("clear_cart command");
    state.store.clear();
    CartResponse::from_state(state)
}

fn describe(key: &LineKey) -> String {
    if key.size.is_empty() {
        format!("{} / {}", key.product_id, key.color_name)
    } else {
        format!("{} / {} / {}", key.product_id, key.color_name, key.size)
    }
}
