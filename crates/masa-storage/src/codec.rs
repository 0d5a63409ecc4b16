//! # Cart Blob Codec
//!
//! The persisted form is a bare JSON array of line items, the layout the
//! storefront has always written:
//!
//! ```json
//! [{"productId":"product1","productName":"...","nameItemInStorage":"...",
//!   "colorName":"...","colorHex":"#000000","size":"1","price":"15.00 د.أ",
//!   "image":"...","quantity":2}]
//! ```
//!
//! Reading is forgiving. Anything that does not decode starts an empty
//! cart rather than breaking the page.

use masa_core::{Cart, CartLineItem};
use tracing::warn;

use crate::backend::KeyValueStorage;
use crate::error::StorageResult;

/// Encodes a cart for storage.
pub fn encode_cart(cart: &Cart) -> StorageResult<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Decodes a stored cart, normalizing it (zero quantities dropped,
/// duplicate keys merged).
pub fn decode_cart(raw: &str) -> StorageResult<Cart> {
    let items: Vec<CartLineItem> = serde_json::from_str(raw)?;
    Ok(Cart::from_items(items))
}

/// Reads the cart stored under `key`.
///
/// ## Returns
/// - `Some(cart)` with the stored cart
/// - `Some(empty)` when the key is absent or the value is corrupt
/// - `None` when the backend itself failed, so callers can keep what they
///   already have instead of wiping it
pub(crate) fn read_cart(storage: &dyn KeyValueStorage, key: &str) -> Option<Cart> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Some(Cart::new()),
        Err(e) => {
            warn!(key, error = %e, "Failed to read cart from storage");
            return None;
        }
    };

    match decode_cart(&raw) {
        Ok(cart) => Some(cart),
        Err(e) => {
            warn!(key, error = %e, "Stored cart is unreadable, starting empty");
            Some(Cart::new())
        }
    }
}

/// Writes `cart` under `key`. Failures are logged and swallowed; the
/// in-memory cart stays authoritative for this session.
pub(crate) fn write_cart(storage: &dyn KeyValueStorage, key: &str, cart: &Cart) -> bool {
    let result = encode_cart(cart).and_then(|raw| storage.set(key, &raw));
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "Failed to persist cart");
            false
        }
    }
}
