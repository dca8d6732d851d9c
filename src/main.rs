mod auth;
mod cli;
mod config;
mod endpoints;
mod error;
mod jenkins;
mod output;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting cibot - chat-driven CI job control");
    cli.execute().await?;

    Ok(())
}
