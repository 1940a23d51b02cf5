use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convertanything")]
#[command(author, version, about = "File conversion service")]
pub struct Cli {
    /// Path to config file (JSON or TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the category a file name classifies to
    Classify {
        /// File name or path
        #[arg(required = true)]
        file_name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the conversion targets offered for a file name
    Options {
        /// File name or path
        #[arg(required = true)]
        file_name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one cleanup sweep over the object store and exit
    Sweep,

    /// Validate configuration file and format catalog
    Validate,

    /// Display version information
    Version,
}
