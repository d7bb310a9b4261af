//! # backoffice
//!
//! Command-line driver for the back-office store.
//!
//! Each command opens a store for one entity kind, dispatches the matching
//! intent, waits for the store to settle and prints the result as JSON.
//!
//! ## Commands
//!
//! - `addresses`: list, get, create, update, delete
//! - `clients`: list
//! - `orders`: list, get, create, update, cancel
//!
//! ## Example
//!
//! ```bash
//! # Second page of addresses, sorted by city
//! backoffice addresses list --page 1 --sort city
//!
//! # Orders waiting for delivery
//! backoffice orders list --status EN_ROUTE
//!
//! # Place and cancel an order
//! backoffice orders create --client-id c-1 --item P-10:2
//! backoffice orders cancel o-1
//!
//! # Try things out without a backend (seeded sample data)
//! backoffice --mock addresses list
//! backoffice --mock orders cancel o-1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::addresses::{self, AddressCommand};
use commands::clients::{self, ClientCommand};
use commands::orders::{self, OrderCommand};
use commands::{MockBackend, Session};
use config::Overrides;

/// Command-line driver for the back-office store.
#[derive(Parser, Debug)]
#[command(name = "backoffice")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./backoffice.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GraphQL endpoint, overriding the configuration
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Bearer token, overriding the configuration
    #[arg(long, global = true)]
    token: Option<String>,

    /// Use an in-memory backend instead of the GraphQL endpoint (for testing/demo).
    /// It starts with clients c-1..c-3, addresses 1..3 and orders o-1..o-2, and
    /// forgets every change when the command exits.
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage delivery addresses
    #[command(subcommand)]
    Addresses(AddressCommand),

    /// Browse clients
    #[command(subcommand)]
    Clients(ClientCommand),

    /// Manage client orders
    #[command(subcommand)]
    Orders(OrderCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let overrides = Overrides {
        endpoint: cli.endpoint,
        token: cli.token,
    };
    let config = config::load(cli.config.as_deref(), &cwd, &overrides)?;

    let session = if cli.mock {
        Session::mock(config, MockBackend::seeded())
    } else {
        Session::remote(config)
    };

    let output = match cli.command {
        Commands::Addresses(command) => addresses::run(&session, command).await?,
        Commands::Clients(command) => clients::run(&session, command).await?,
        Commands::Orders(command) => orders::run(&session, command).await?,
    };

    commands::print(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "addresses",
            "list",
            "--page",
            "2",
            "--mock",
            "--endpoint",
            "http://backend/graphql",
        ])
        .unwrap();

        assert!(cli.mock);
        assert_eq!(cli.endpoint.as_deref(), Some("http://backend/graphql"));
        match cli.command {
            Commands::Addresses(AddressCommand::List(args)) => assert_eq!(args.page, Some(2)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_order_lines_and_status() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "orders",
            "create",
            "--client-id",
            "c-1",
            "--item",
            "P-1:2",
            "--item",
            "P-2:1",
        ])
        .unwrap();
        match cli.command {
            Commands::Orders(OrderCommand::Create(fields)) => assert_eq!(fields.items.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli =
            Cli::try_parse_from(["backoffice", "orders", "list", "--status", "en_route"]).unwrap();
        match cli.command {
            Commands::Orders(OrderCommand::List(args)) => {
                assert_eq!(args.status, Some(store_types::ClientOrderStatus::EnRoute))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_desc_without_sort() {
        assert!(Cli::try_parse_from(["backoffice", "clients", "list", "--desc"]).is_err());
    }

    #[test]
    fn order_create_needs_a_line() {
        assert!(
            Cli::try_parse_from(["backoffice", "orders", "create", "--client-id", "c-1"]).is_err()
        );
    }
}
