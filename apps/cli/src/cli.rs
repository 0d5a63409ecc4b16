//! # Command Line Definition
//!
//! ```text
//! masa [--data-dir DIR] <COMMAND>
//!
//!   catalog   [PRODUCT]                          list products
//!   add       PRODUCT --color C [--size S]       add one unit
//!   remove    PRODUCT --color C [--size S]       drop a line
//!   set-qty   PRODUCT QTY --color C [--size S]   set a line's quantity
//!   clear                                        empty the cart
//!   show                                         items and totals
//!   checkout  --name --phone --governorate --address [--notes]
//!   config                                       effective settings
//! ```
//!
//! `--color` takes a swatch index (`0`) or a color name (`أسود`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "masa", version, about = "Masa Fashion shopping cart")]
pub struct Cli {
    /// Directory holding the cart and recorded orders
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the catalog, or one product
    Catalog {
        /// Product id, e.g. product1
        product: Option<String>,
    },

    /// Add one unit of a product variant
    Add {
        #[command(flatten)]
        line: LineArgs,

        /// Image to show for the line instead of the color's own
        #[arg(long)]
        image: Option<String>,
    },

    /// Remove a line from the cart
    Remove {
        #[command(flatten)]
        line: LineArgs,
    },

    /// Set a line's quantity; 0 or less removes it
    SetQty {
        #[command(flatten)]
        line: LineArgs,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,

    /// Show the cart with totals
    Show,

    /// Hand the cart off as an order
    Checkout(CheckoutArgs),

    /// Show the effective configuration
    Config,
}

/// Identifies a product variant.
#[derive(Debug, Clone, Args)]
pub struct LineArgs {
    /// Product id, e.g. product1
    pub product: String,

    /// Color index or name
    #[arg(long, short)]
    pub color: String,

    /// Size number; required for sized products
    #[arg(long, short)]
    pub size: Option<String>,
}

/// The checkout form.
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub phone: String,

    /// Delivery region
    #[arg(long)]
    pub governorate: String,

    #[arg(long)]
    pub address: String,

    #[arg(long, default_value = "")]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "masa", "--data-dir", "/tmp/m", "add", "product1", "--color", "0", "--size", "2",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/m")));
        match cli.command {
            Command::Add { line, image } => {
                assert_eq!(line.product, "product1");
                assert_eq!(line.color, "0");
                assert_eq!(line.size.as_deref(), Some("2"));
                assert_eq!(image, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_quantity() {
        let cli = Cli::try_parse_from(["masa", "set-qty", "product2", "-1", "--color", "بيج"]).unwrap();
        match cli.command {
            Command::SetQty { line, quantity } => {
                assert_eq!(quantity, -1);
                assert_eq!(line.color, "بيج");
                assert_eq!(line.size, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_checkout_requires_form_fields() {
        assert!(Cli::try_parse_from(["masa", "checkout", "--name", "ليلى"]).is_err());

        let cli = Cli::try_parse_from([
            "masa", "checkout", "--name", "ليلى", "--phone", "0791234567",
            "--governorate", "عمان", "--address", "شارع الجامعة",
        ])
        .unwrap();
        match cli.command {
            Command::Checkout(form) => assert_eq!(form.notes, ""),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
