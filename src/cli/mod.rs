//! CLI module - Command-line interface for carlot
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// carlot - Car dealership inventory backend
#[derive(Parser)]
#[command(name = "carlot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create an administrator account
    CreateAdmin {
        email: String,
        name: String,
        password: String,
    },

    /// Grant the admin role to an existing account
    Promote { email: String },

    /// Load demo listings, a demo customer and a sample inquiry
    Seed,

    /// Search available listings from the terminal
    #[command(alias = "ls")]
    Cars {
        /// Free-text search tokens
        search: Vec<String>,
    },
}

pub use commands::*;
