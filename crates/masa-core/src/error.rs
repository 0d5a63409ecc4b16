//! # Error Types
//!
//! Domain-specific error types for masa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  masa-core errors (this file)                                          │
//! │  ├── CoreError        - Catalog resolution failures                    │
//! │  └── ValidationError  - Customer / quantity input failures             │
//! │                                                                         │
//! │  masa-storage errors (separate crate)                                  │
//! │  └── StorageError     - Backend read/write failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the user sees (serialized)                │
//! │                                                                         │
//! │  NOTE: cart mutations themselves never produce any of these.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while turning a product-page selection into an `ItemSpec`.
///
/// These belong to the caller side of the cart: the cart itself accepts
/// any spec.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Color index or name does not exist for the product.
    #[error("Color '{color}' not found for product {product_id}")]
    ColorNotFound { product_id: String, color: String },

    /// Color exists but is sold out.
    #[error("Color '{color}' of product {product_id} is out of stock")]
    ColorUnavailable { product_id: String, color: String },

    /// The product is sized and no size was chosen.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "Add to cart" without picking a size
    ///      │
    ///      ▼
    /// SizeRequired { product_id: "product1" }
    ///      │
    ///      ▼
    /// UI shows: "الرجاء اختيار المقاس أولاً"
    /// ```
    #[error("Product {product_id} requires a size")]
    SizeRequired { product_id: String },

    /// Size label does not exist for the product.
    #[error("Size '{size}' not found for product {product_id}")]
    SizeNotFound { product_id: String, size: String },

    /// Size exists but is marked unavailable.
    #[error("Size '{size}' of product {product_id} is unavailable")]
    SizeUnavailable { product_id: String, size: String },

    /// Catalog JSON could not be read.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for the checkout form and optional pre-checks on quantities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a phone number with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
