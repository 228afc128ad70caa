//! The Quill backend server: a small GraphQL API for a blog.

use clap::Parser;
use std::{env, fs, path::PathBuf};

use crate::{
    args::{Args, Command},
    config::Config,
    prelude::*,
};

mod api;
mod args;
mod config;
mod http;
mod logger;
mod model;
mod prelude;
mod store;


#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Log error in case stdout is not connected and it is logged into a file.
        error!("{:?}", e);

        // Show a somewhat nice representation of the error
        eprintln!();
        eprintln!();
        bunt::eprintln!("{$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
        eprintln!();
        if e.chain().len() > 1 {
            bunt::eprintln!("{$red+italic}Caused by:{/$}");
        }

        for (i, cause) in e.chain().skip(1).enumerate() {
            eprint!(" {: >1$}", "", i * 2);
            eprintln!("‣ {cause}");
        }

        std::process::exit(1);
    }
}

/// Main entry point.
async fn run() -> Result<()> {
    // If `RUST_BACKTRACE` wasn't already set, we default to `1`. Backtraces
    // are almost always useful for debugging and we don't expect panics to
    // occur regularly.
    if env::var("RUST_BACKTRACE") == Err(env::VarError::NotPresent) {
        env::set_var("RUST_BACKTRACE", "1");
    }

    let args = Args::parse();

    match &args.cmd {
        Command::Serve { shared } => {
            let config = load_config_and_init_logger(shared)?;
            start_server(config).await?;
        }
        Command::WriteConfig { target } => config::write_template(target.as_ref())?,
        Command::ExportApiSchema { target } => export_api_schema(target.as_ref())?,
    }

    Ok(())
}

async fn start_server(config: Config) -> Result<()> {
    info!("Starting Quill backend ...");
    trace!("Configuration: {:#?}", config);

    let store = store::connect(&config.store).await
        .context("failed to set up the store")?;

    // Start web server
    let root_node = api::root_node();
    http::serve(config, root_node, store).await
        .context("failed to start HTTP server")?;

    Ok(())
}

/// Exports the API as GraphQL schema to the given file or stdout.
fn export_api_schema(target: Option<&PathBuf>) -> Result<()> {
    let schema = api::root_node().as_schema_language();
    match target {
        Some(path) => fs::write(path, schema)
            .context(format!("failed to write schema to '{}'", path.display()))?,
        None => println!("{schema}"),
    }

    Ok(())
}

fn load_config_and_init_logger(shared: &args::Shared) -> Result<Config> {
    // Load configuration.
    let (config, path) = match &shared.config {
        Some(path) => {
            let config = Config::load_from(path)
                .context(format!("failed to load config from '{}'", path.display()))?;
            (config, path.clone())
        }
        None => Config::from_default_locations()?,
    };

    // Initialize logger. Unfortunately, we can only do this here after
    // reading the config.
    logger::init(&config.log)?;
    info!("Loaded config from '{}'", path.display());

    Ok(config)
}
