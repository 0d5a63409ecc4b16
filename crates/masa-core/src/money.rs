//! # Money Module
//!
//! Provides the `Money` type and the ONE function allowed to turn a catalog
//! price string into a number.
//!
//! ## Why a Single Parser?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE PRICE STRING PROBLEM                                               │
//! │                                                                         │
//! │  Catalog prices are display strings:  "15.00 د.أ"   "21.99 د.أ"  "15 د.أ"│
//! │                                                                         │
//! │  Every surface needs the number:                                        │
//! │    navbar badge, cart drawer, order summary, analytics, order message  │
//! │                                                                         │
//! │  If two surfaces parse differently, the drawer shows 23.00 while the   │
//! │  order message says 23.01. So: one parser, one contract.               │
//! │                                                                         │
//! │  CONTRACT: strip every char that is not [0-9.], take the leading       │
//! │  decimal number, anything unparsable is 0.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use masa_core::money::Money;
//!
//! let price = Money::parse_display("15.00 د.أ");
//! assert_eq!(price.cents(), 1500);
//!
//! let line = price * 2u32;
//! assert_eq!(line.to_decimal_string(), "30.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in hundredths of the currency unit.
///
/// The storefront sells in Jordanian dinars but only ever displays two
/// decimals, so hundredths are the smallest unit we track.
///
/// ## Design Decisions
/// - **i64 (signed)**: an effective unit price may drop below zero when the
///   multi-item discount exceeds a (hypothetical) cheap catalog price
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from hundredths.
    ///
    /// ## Example
    /// ```rust
    /// use masa_core::money::Money;
    ///
    /// let fee = Money::from_cents(200); // 2.00
    /// assert_eq!(fee.cents(), 200);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Parses a catalog display price.
    ///
    /// ## Contract
    /// 1. Drop every character that is not an ASCII digit or `.`
    /// 2. Read the leading decimal number (`digits[.digits]`)
    /// 3. Round anything past two fractional digits half-up
    /// 4. Nothing readable → zero
    ///
    /// Arabic-Indic digits are NOT digits here; the catalog writes prices
    /// with ASCII digits and the currency suffix is simply discarded.
    ///
    /// ## Example
    /// ```rust
    /// use masa_core::money::Money;
    ///
    /// assert_eq!(Money::parse_display("15.00 د.أ").cents(), 1500);
    /// assert_eq!(Money::parse_display("15 د.أ").cents(), 1500);
    /// assert_eq!(Money::parse_display("21.99 د.أ").cents(), 2199);
    /// assert_eq!(Money::parse_display("price on request").cents(), 0);
    /// ```
    pub fn parse_display(text: &str) -> Money {
        let mut chars = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .peekable();

        let mut seen_digit = false;
        let mut major: i64 = 0;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            major = major.saturating_mul(10).saturating_add(i64::from(d));
            seen_digit = true;
            chars.next();
        }

        let mut minor: i64 = 0;
        let mut round_up = false;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut position = 0;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                match position {
                    0 | 1 => minor = minor * 10 + i64::from(d),
                    2 => round_up = d >= 5,
                    _ => {}
                }
                seen_digit = true;
                position += 1;
                chars.next();
            }
            if position == 1 {
                minor *= 10;
            }
        }

        if !seen_digit {
            return Money::zero();
        }

        let cents = major.saturating_mul(100).saturating_add(minor);
        Money(if round_up { cents.saturating_add(1) } else { cents })
    }

    /// Returns the value in hundredths.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use masa_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1300); // 13.00 after discount
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 3900);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats as a plain decimal with two places, e.g. `"23.00"`.
    ///
    /// This is the format order messages and the cart drawer show before the
    /// currency symbol is appended.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates. Stored prices are untrusted and may parse to the
// `i64` limits.

/// Plain decimal, no symbol. Use `StoreConfig::format_money` for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a cart quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(i64::from(qty))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
