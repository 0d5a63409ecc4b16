//! # Commands Module
//!
//! One function per subcommand, each a thin layer over [`AppState`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── Product listing
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Order handoff
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! Commands return serializable responses; `lib.rs` prints them as JSON.
//!
//! [`AppState`]: crate::state::AppState

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
