//! This module defines the command line arguments Quill accepts.

use std::path::PathBuf;
use clap::{Parser, Subcommand};


#[derive(Debug, Parser)]
#[command(about = "GraphQL API server for a blog.", version)]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Starts the backend HTTP server.
    Serve {
        #[command(flatten)]
        shared: Shared,
    },

    /// Outputs a template for the configuration file (which includes
    /// descriptions of all options).
    WriteConfig {
        /// Target file. If not specified, the template is written to stdout.
        target: Option<PathBuf>,
    },

    /// Exports the API as GraphQL schema.
    ExportApiSchema {
        /// Target file. If not specified, the schema is written to stdout.
        target: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
pub(crate) struct Shared {
    /// Path to the configuration file. If this is not specified, Quill will
    /// try opening `config.toml` or `/etc/quill/config.toml`.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}
