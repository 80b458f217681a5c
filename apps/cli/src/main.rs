//! coursesmith CLI — turn a website into a teaching document.
//!
//! Fetches a site, asks a language model which of its links are educational,
//! aggregates the linked pages, and generates Markdown teaching material.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
