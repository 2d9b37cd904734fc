//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the page into a single self-contained index.html
    Build {
        /// Output directory, relative to the site root (default: paths.out_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Serve the site with live reload
    Dev {
        /// Port to listen on (default: server.port)
        #[arg(short, long, env = "STOREFRONT_PORT")]
        port: Option<u16>,

        /// Address to bind (default: server.host)
        #[arg(long, env = "STOREFRONT_HOST")]
        host: Option<String>,
    },

    /// Render the section template and print the fragment
    Render {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
