//! # Validation Module
//!
//! Input checks that live on the CALLER side of the cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Happens                           │
//! │                                                                         │
//! │  Product page ──► size chosen? (Catalog::resolve)                       │
//! │                                                                         │
//! │  CartStore ─────► NOTHING. Accepts any ItemSpec, any quantity.          │
//! │                                                                         │
//! │  Checkout form ─► THIS MODULE: name, phone, governorate, address        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use masa_core::checkout::CustomerDetails;
//! use masa_core::validation::validate_customer;
//!
//! let customer = CustomerDetails {
//!     name: "سارة".to_string(),
//!     phone: "0791234567".to_string(),
//!     governorate: "عمان".to_string(),
//!     address: "خلدا، شارع وصفي التل".to_string(),
//!     notes: String::new(),
//! };
//! assert!(validate_customer(&customer, &[]).is_ok());
//! ```

use crate::checkout::CustomerDetails;
use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text notes accepted on the checkout form.
pub const MAX_NOTES_LEN: usize = 500;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

// =============================================================================
// Checkout Form
// =============================================================================

/// Validates the checkout form.
///
/// ## Rules
/// - name, phone, governorate and address are required (after trimming)
/// - phone: 7–15 digits once spaces, `+` and `-` are removed
/// - governorate: must be one of `governorates` when that list is non-empty
/// - notes: optional, at most [`MAX_NOTES_LEN`] characters
pub fn validate_customer(
    customer: &CustomerDetails,
    governorates: &[String],
) -> ValidationResult<()> {
    require("name", &customer.name)?;
    validate_phone(&customer.phone)?;
    validate_governorate(&customer.governorate, governorates)?;
    require("address", &customer.address)?;

    if customer.notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(())
}

/// Validates a phone number as typed into the form.
///
/// ## Example
/// ```rust
/// use masa_core::validation::validate_phone;
///
/// assert!(validate_phone("079 123 4567").is_ok());
/// assert!(validate_phone("+962-79-1234567").is_ok());
/// assert!(validate_phone("07X").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    require("phone", phone)?;

    let digits: String = phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '+' | '-'))
        .collect();

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+' and '-'".to_string(),
        });
    }

    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: format!("must have {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits"),
        });
    }

    Ok(())
}

/// Validates the delivery region against the accepted list.
pub fn validate_governorate(governorate: &str, governorates: &[String]) -> ValidationResult<()> {
    require("governorate", governorate)?;

    if !governorates.is_empty() && !governorates.iter().any(|g| g == governorate.trim()) {
        return Err(ValidationError::NotAllowed {
            field: "governorate".to_string(),
            allowed: governorates.to_vec(),
        });
    }

    Ok(())
}

// =============================================================================
// Quantity
// =============================================================================

/// Optional pre-check for quantity inputs.
///
/// The cart itself treats `< 1` as remove and never rejects; call this when
/// a form should refuse the value instead.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}
