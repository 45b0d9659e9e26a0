//! Command line interface
//!
//! - `serve`: run the HTTP service
//! - `issue`: sign a token for a subject and print it
//! - `verify`: verify a token and print its claims

pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Stateless JWT issuance and verification backed by a KMS signing key
#[derive(Parser)]
#[command(name = "kms-jwt-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve,

    /// Issue a token and print it to stdout
    Issue {
        /// Subject (`sub` claim)
        #[arg(short, long)]
        subject: String,
    },

    /// Verify a token and print its claims as JSON
    Verify {
        /// Compact-serialized token
        token: String,
    },
}

/// Load `.env`, layered configuration, and reject invalid settings
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;

    Ok(config)
}
