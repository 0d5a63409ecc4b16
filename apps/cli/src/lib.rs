//! # masa CLI Library
//!
//! The shopping cart as a command line tool. Each invocation opens the cart
//! persisted in the data directory, runs one command and prints its result
//! as JSON.
//!
//! ## Module Organization
//! ```text
//! masa_cli/
//! ├── lib.rs          ◄─── You are here (setup & dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state.rs        ◄─── AppState, data directory
//! ├── handoff.rs      ◄─── Order outbox (orders/*.json)
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Product listing
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── checkout.rs ◄─── Order handoff
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output Streams
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdout ◄── command result (JSON)                                       │
//! │  stderr ◄── logs (tracing) and errors ({"code": ..., "message": ...})   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod handoff;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use masa_core::StoreConfig;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use error::ApiError;
use state::{resolve_data_dir, AppState};

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging ─► stderr, RUST_LOG or "warn,masa=info"          │
/// │  2. Parse Arguments ────► clap (exits with usage on error)              │
/// │  3. Resolve Data Dir ───► --data-dir, MASA_DATA_DIR, platform default   │
/// │  4. Load Config ────────► StoreConfig::from_env (MASA_*)                │
/// │  5. Open State ─────────► CartStore over FileStorage                    │
/// │  6. Dispatch ───────────► print JSON result                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match execute(cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = ?err.code, "{}", err.message);
            match serde_json::to_string(&err) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Opens state for `cli` and runs its command, returning the JSON output.
pub fn execute(cli: Cli) -> Result<String, ApiError> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = StoreConfig::from_env();
    info!(data_dir = %data_dir.display(), storage_key = %config.storage_key, "Opening cart");

    let state = AppState::open(data_dir, config);
    dispatch(&state, cli.command)
}

/// Runs one command against `state`.
pub fn dispatch(state: &AppState, command: Command) -> Result<String, ApiError> {
    match command {
        Command::Catalog { product: None } => to_json(&commands::catalog::list_products(state)),
        Command::Catalog {
            product: Some(product_id),
        } => to_json(&commands::catalog::get_product(state, &product_id)?),
        Command::Add { line, image } => to_json(&commands::cart::add_to_cart(state, &line, image)?),
        Command::Remove { line } => to_json(&commands::cart::remove_from_cart(state, &line)),
        Command::SetQty { line, quantity } => {
            to_json(&commands::cart::update_cart_item(state, &line, quantity))
        }
        Command::Clear => to_json(&commands::cart::clear_cart(state)),
        Command::Show => to_json(&commands::cart::get_cart(state)),
        Command::Checkout(form) => to_json(&commands::checkout::checkout(state, &form)?),
        Command::Config => to_json(&commands::config::get_config(state)),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=masa_storage=trace` - Show signal traffic
/// - Default: WARN, INFO for masa crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,masa=info"));

    // A second init (tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_in(dir: &TempDir, args: &[&str]) -> Result<serde_json::Value, ApiError> {
        let dir_arg = dir.path().to_str().unwrap();
        let mut argv = vec!["masa", "--data-dir", dir_arg];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let json = execute(cli)?;
        Ok(serde_json::from_str(&json).unwrap())
    }

    #[test]
    fn test_session_across_invocations() {
        let dir = TempDir::new().unwrap();

        let added = run_in(&dir, &["add", "product1", "--color", "0", "--size", "1"]).unwrap();
        assert_eq!(added["outcome"]["kind"], "inserted");
        assert_eq!(added["event"]["event"]["type"], "AddToCart");

        run_in(&dir, &["add", "product2", "--color", "رمادي"]).unwrap();
        let shown = run_in(&dir, &["show"]).unwrap();
        assert_eq!(shown["totals"]["totalPrice"], 3000);
        assert_eq!(shown["badge"], "2");

        let removed = run_in(&dir, &["set-qty", "product2", "0", "--color", "1"]).unwrap();
        assert_eq!(removed["totals"]["totalPrice"], 1500);

        let cleared = run_in(&dir, &["clear"]).unwrap();
        assert_eq!(cleared["items"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_errors_surface_as_api_errors() {
        let dir = TempDir::new().unwrap();
        let err = run_in(&dir, &["add", "product9", "--color", "0"]).unwrap_err();
        assert_eq!(err.code, error::ErrorCode::NotFound);

        let err = run_in(&dir, &["add", "product1", "--color", "0"]).unwrap_err();
        assert_eq!(err.code, error::ErrorCode::ValidationError);

        // Missing cart lines are not errors.
        let shown = run_in(&dir, &["remove", "product2", "--color", "0"]).unwrap();
        assert_eq!(shown["items"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_catalog_and_config() {
        let dir = TempDir::new().unwrap();
        let catalog = run_in(&dir, &["catalog"]).unwrap();
        assert_eq!(catalog.as_array().unwrap().len(), 6);

        let product = run_in(&dir, &["catalog", "product4"]).unwrap();
        assert_eq!(product["id"], "product4");

        let config = run_in(&dir, &["config"]).unwrap();
        assert_eq!(config["dataDir"], dir.path().to_str().unwrap());
    }
}
