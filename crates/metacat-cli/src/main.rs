//! Metacat Command-Line Client
//!
//! Inspects and maintains a metadata catalog document.

mod executor;
mod formatter;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use metacat_core::StoreConfig;
use std::path::PathBuf;

/// Metacat Command-Line Client
#[derive(Parser, Debug)]
#[command(name = "metacat")]
#[command(version, about = "Metacat catalog inspector")]
pub struct Args {
    /// Path of the catalog document
    #[arg(short = 'p', long, default_value = "./Configuration.json")]
    pub path: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Store generated form code uncompressed
    #[arg(long)]
    pub no_compress: bool,

    /// Write the document without indentation
    #[arg(long)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new catalog document
    Init {
        /// Catalog name
        #[arg(long)]
        name: Option<String>,

        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },
    /// Show object counts per section
    Summary,
    /// List fields that depend on a catalog or document (e.g. Catalog.Item)
    Deps { pointer: String },
    /// List fields that point at a catalog or document
    Usages {
        pointer: String,

        /// Print physical table.column pairs
        #[arg(long)]
        columns: bool,
    },
    /// List fields that use an enumeration (Unit or Enumerations.Unit)
    EnumUsages { pointer: String },
    /// Check whether a name is usable for a schema object
    CheckName { name: String },
    /// Allocate fresh physical table names
    AllocTable {
        /// Tables already present in storage
        #[arg(long, value_delimiter = ',')]
        live: Vec<String>,

        /// Number of names to allocate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Report references whose target cannot be resolved
    Dangling,
}

/// Runtime configuration derived from [`Args`].
#[derive(Debug)]
pub struct CliConfig {
    pub store: StoreConfig,
    pub format: OutputFormat,
    pub command: Command,
}

impl Args {
    /// Convert command-line arguments to runtime configuration.
    pub fn into_config(self) -> CliConfig {
        CliConfig {
            store: StoreConfig::new(self.path)
                .with_compress_blobs(!self.no_compress)
                .with_pretty(!self.compact),
            format: self.format,
            command: self.command,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("metacat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config();
    let formatter = formatter::create_formatter(config.format);

    match executor::execute(&config.store, &config.command, &*formatter).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
