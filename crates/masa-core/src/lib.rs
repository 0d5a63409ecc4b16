//! # masa-core: Pure Cart Logic for the Masa Storefront
//!
//! This crate is the **heart** of the storefront cart. It contains the
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Masa Storefront Cart                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   UI fragments: product page, navbar badge, drawer, checkout    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         masa-storage: CartStore, storage, signal bus            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ masa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ pricing │ │ catalog │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌──────────┐ ┌────────┐           │   │
//! │  │   │ checkout │ │ analytics │ │validation│ │ config │           │   │
//! │  │   └──────────┘ └───────────┘ └──────────┘ └────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, item specs, identity keys
//! - [`money`] - Money type and the single price parser
//! - [`cart`] - The cart state machine
//! - [`pricing`] - Multi-item discount, delivery fee, totals
//! - [`catalog`] - Product data and selection resolution
//! - [`checkout`] - Snapshot handed to the order channel
//! - [`analytics`] - Commerce event payloads
//! - [`validation`] - Checkout form checks
//! - [`config`] - Store configuration
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use masa_core::{Cart, Catalog, ColorChoice, PricingPolicy, Selection};
//!
//! let catalog = Catalog::builtin();
//! let mut cart = Cart::new();
//!
//! let abaya = catalog
//!     .resolve(&Selection::new("product1", ColorChoice::Index(0)).with_size("1"))
//!     .unwrap();
//! cart.add_item(abaya);
//! assert_eq!(cart.totals(&PricingPolicy::default()).total_price.cents(), 1500);
//!
//! let dress = catalog
//!     .resolve(&Selection::new("product2", ColorChoice::Index(0)))
//!     .unwrap();
//! cart.add_item(dress);
//! // (15 - 2) + (17 - 2) + 2 delivery
//! assert_eq!(cart.totals(&PricingPolicy::default()).total_price.cents(), 3000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::{CommerceEvent, ContentLine, TrackedEvent};
pub use cart::{AddOutcome, Cart};
pub use catalog::{Catalog, CatalogEntry, ColorChoice, ColorOption, Product, Selection, SizeOption};
pub use checkout::{CheckoutLine, CheckoutSnapshot, CustomerDetails};
pub use config::StoreConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{CartTotals, PricingPolicy};
pub use types::{CartLineItem, ItemSpec, LineKey};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity a form should accept for one line.
///
/// The cart itself never enforces this; see
/// [`validation::validate_quantity`].
pub const MAX_ITEM_QUANTITY: i64 = 99;
