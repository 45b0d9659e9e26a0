use clap::Parser;
use kms_jwt_service::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Issue { subject } => cli::token::issue(&subject).await,
        Command::Verify { token } => cli::token::verify(&token).await,
    }
}
