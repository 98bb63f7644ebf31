//! FlatKV CLI
//!
//! Command-line interface for inspecting and mutating a store file.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use flatkv::Store;

/// FlatKV CLI
#[derive(Parser, Debug)]
#[command(name = "flatkv-cli")]
#[command(about = "CLI for the FlatKV single-file key-value store")]
struct Args {
    /// Path of the store file
    #[arg(short, long, default_value = "./flatkv.db")]
    file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Check whether a key exists
    Has {
        /// The key to check
        key: String,
    },

    /// List all keys
    Keys,

    /// Remove every key
    Clear,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let store = match Store::open_path(&args.file) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open store {}: {}", args.file, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&store, args.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(store: &Store, command: Commands) -> flatkv::Result<()> {
    match command {
        Commands::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => {
                eprintln!("(not found)");
                std::process::exit(2);
            }
        },
        Commands::Set { key, value } => {
            store.set(&key, value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            if store.remove(&key)? {
                println!("OK");
            } else {
                println!("(not found)");
            }
        }
        Commands::Has { key } => {
            println!("{}", store.contains(&key));
        }
        Commands::Keys => {
            for key in store.keys() {
                println!("{}", key);
            }
        }
        Commands::Clear => {
            store.clear()?;
            println!("OK");
        }
    }
    Ok(())
}
