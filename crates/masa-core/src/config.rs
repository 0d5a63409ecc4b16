//! # Store Configuration
//!
//! Settings shared by every cart surface.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MASA_*`)
//! 2. Defaults (this file)
//!
//! Overrides are applied through a lookup function so tests never touch
//! the process environment.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::pricing::PricingPolicy;

/// Local storage key the cart lives under. Changing it orphans every saved
/// cart.
pub const DEFAULT_STORAGE_KEY: &str = "masa_fashion_cart";

/// Delivery regions offered on the checkout form.
pub const GOVERNORATES: [&str; 12] = [
    "عمان",
    "إربد",
    "الزرقاء",
    "العقبة",
    "السلط",
    "المفرق",
    "الكرك",
    "جرش",
    "مادبا",
    "عجلون",
    "معان",
    "الطفيلة",
];

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Storage key of the persisted cart.
    pub storage_key: String,

    /// Currency code (ISO 4217), reported with analytics events.
    pub currency_code: String,

    /// Currency symbol appended to displayed amounts.
    pub currency_symbol: String,

    /// Multi-item discount and delivery fee.
    pub pricing: PricingPolicy,

    /// Chat number orders are handed off to. Passed through to the handoff
    /// channel; the cart never dials it.
    pub whatsapp_phone: Option<String>,

    /// Accepted delivery regions. Empty accepts any.
    pub governorates: Vec<String>,
}

impl Default for StoreConfig {
    /// ## Default Values
    /// - Storage key: `masa_fashion_cart`
    /// - Currency: JOD (د.أ)
    /// - Pricing: 2.00 off each unit and 2.00 delivery above one unit
    fn default() -> Self {
        StoreConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency_code: "JOD".to_string(),
            currency_symbol: "د.أ".to_string(),
            pricing: PricingPolicy::default(),
            whatsapp_phone: None,
            governorates: GOVERNORATES.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `MASA_*` environment variables.
    ///
    /// ## Environment Variables
    /// - `MASA_STORAGE_KEY`: storage key
    /// - `MASA_CURRENCY_CODE` / `MASA_CURRENCY_SYMBOL`
    /// - `MASA_UNIT_DISCOUNT` / `MASA_DELIVERY_FEE`: amounts, e.g. `"2.00"`
    /// - `MASA_MULTI_ITEM_THRESHOLD`: unit count above which they apply
    /// - `MASA_WHATSAPP_PHONE`: handoff number
    pub fn from_env() -> Self {
        let mut config = StoreConfig::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Applies overrides from `lookup`. Unparsable values keep the current
    /// setting.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("MASA_STORAGE_KEY") {
            self.storage_key = key.trim().to_string();
        }
        if let Some(code) = lookup("MASA_CURRENCY_CODE") {
            self.currency_code = code.trim().to_string();
        }
        if let Some(symbol) = lookup("MASA_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol.trim().to_string();
        }
        if let Some(amount) = lookup("MASA_UNIT_DISCOUNT").as_deref().and_then(parse_amount) {
            self.pricing.unit_discount = amount;
        }
        if let Some(amount) = lookup("MASA_DELIVERY_FEE").as_deref().and_then(parse_amount) {
            self.pricing.delivery_fee = amount;
        }
        if let Some(threshold) = lookup("MASA_MULTI_ITEM_THRESHOLD")
            .and_then(|v| v.trim().parse::<u32>().ok())
        {
            self.pricing.multi_item_threshold = threshold;
        }
        if let Some(phone) = lookup("MASA_WHATSAPP_PHONE") {
            self.whatsapp_phone = Some(phone.trim().to_string());
        }
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use masa_core::config::StoreConfig;
    /// use masa_core::money::Money;
    ///
    /// let config = StoreConfig::default();
    /// assert_eq!(config.format_money(Money::from_cents(2300)), "23.00 د.أ");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        format!("{} {}", amount.to_decimal_string(), self.currency_symbol)
    }
}

/// Reads an amount through the catalog price parser. `None` when there is
/// no digit at all, so a typo does not silently zero a fee.
fn parse_amount(value: &str) -> Option<Money> {
    if value.chars().any(|c| c.is_ascii_digit()) {
        Some(Money::parse_display(value))
    } else {
        None
    }
}
