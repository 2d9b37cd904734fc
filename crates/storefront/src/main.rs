mod cli;
mod commands;
mod context;
mod logging;
mod output;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Build { out_dir } => commands::build::run(out_dir, cli.verbose),
        Commands::Dev { port, host } => commands::dev::run(port, host, cli.verbose),
        Commands::Render { json } => commands::render::run(json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
