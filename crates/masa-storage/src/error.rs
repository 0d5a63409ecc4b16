//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module) ← Adds context and categorization          │
//! │       │                                                                 │
//! │       ├──► CartStore: logged and swallowed (the cart keeps working)    │
//! │       │                                                                 │
//! │       └──► Direct backend callers (CLI): ApiError                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use masa_core::ValidationError;
use thiserror::Error;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    ///
    /// ## When This Occurs
    /// - Data directory not writable
    /// - Disk full
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cart blob could not be encoded or decoded.
    #[error("Cart data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key is empty or contains characters the backend cannot store.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// The write would exceed the backend's size limit.
    #[error("Storage quota exceeded writing '{key}': {needed} bytes, {quota} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Reasons an order could not be handed off.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The checkout form failed validation.
    #[error("Invalid customer details: {0}")]
    InvalidCustomer(#[from] ValidationError),

    /// The external channel refused or failed. The cart is left intact.
    #[error("Order handoff failed: {0}")]
    Handoff(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StorageError::QuotaExceeded {
            key: "masa_fashion_cart".to_string(),
            needed: 6000,
            quota: 5000,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded writing 'masa_fashion_cart': 6000 bytes, 5000 allowed"
        );

        let err: CheckoutError = ValidationError::required("name").into();
        assert_eq!(err.to_string(), "Invalid customer details: name is required");
    }
}
