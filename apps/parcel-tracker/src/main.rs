//! Parcel Tracker - command-line access to the parcel store
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parcel_core::{
    ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelStore, SqliteParcelStore, StoreConfig,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Track shipped parcels in a SQLite database
#[derive(Parser)]
#[command(name = "parcel-tracker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, env = "PARCEL_DB", global = true)]
    db: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the parcel table if it does not exist
    Init,
    /// Register a new parcel and print its number
    Add {
        #[arg(long)]
        client: ClientId,
        #[arg(long)]
        address: String,
        #[arg(long, default_value_t = ParcelStatus::Registered)]
        status: ParcelStatus,
    },
    /// Print one parcel
    Get { number: ParcelNumber },
    /// Print every parcel of a client
    List {
        #[arg(long)]
        client: ClientId,
    },
    /// Change the delivery address
    SetAddress { number: ParcelNumber, address: String },
    /// Change the status
    SetStatus {
        number: ParcelNumber,
        status: ParcelStatus,
    },
    /// Remove a parcel
    Delete { number: ParcelNumber },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(db) = cli.db {
        config.database = db;
    }
    if matches!(cli.command, Commands::Init) {
        config.create_schema = true;
    }

    let store = SqliteParcelStore::open_with_config(&config)?;
    run(&store, cli.command)
}

fn run(store: &dyn ParcelStore, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Init => {
            tracing::info!("parcel table ready");
        }
        Commands::Add {
            client,
            address,
            status,
        } => {
            let mut parcel = Parcel::new(client, address);
            parcel.status = status;
            let number = store.add(&parcel)?;
            println!("{}", serde_json::to_string_pretty(&parcel.with_number(number))?);
        }
        Commands::Get { number } => {
            let parcel = store.get(number)?;
            println!("{}", serde_json::to_string_pretty(&parcel)?);
        }
        Commands::List { client } => {
            let mut parcels = store.get_by_client(client)?;
            parcels.sort_by_key(|p| p.number);
            println!("{}", serde_json::to_string_pretty(&parcels)?);
        }
        Commands::SetAddress { number, address } => {
            store.set_address(number, &address)?;
        }
        Commands::SetStatus { number, status } => {
            store.set_status(number, status)?;
        }
        Commands::Delete { number } => {
            store.delete(number)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::MemoryParcelStore;

    #[test]
    fn test_cli_parses_status() {
        let cli = Cli::try_parse_from(["parcel-tracker", "set-status", "7", "sent"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetStatus {
                number: 7,
                status: ParcelStatus::Sent
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["parcel-tracker", "set-status", "7", "lost"]).is_err());
    }

    #[test]
    fn test_add_defaults_to_registered() {
        let cli = Cli::try_parse_from([
            "parcel-tracker",
            "add",
            "--client",
            "1000",
            "--address",
            "test",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Add {
                status: ParcelStatus::Registered,
                ..
            }
        ));
    }

    #[test]
    fn test_run_commands_against_store() {
        let store = MemoryParcelStore::new();
        run(
            &store,
            Commands::Add {
                client: 1,
                address: "a".into(),
                status: ParcelStatus::Registered,
            },
        )
        .unwrap();
        run(
            &store,
            Commands::SetAddress {
                number: 1,
                address: "b".into(),
            },
        )
        .unwrap();
        assert_eq!(store.get(1).unwrap().address, "b");

        run(&store, Commands::Delete { number: 1 }).unwrap();
        assert!(run(&store, Commands::Get { number: 1 }).is_err());
    }
}
