//! Quarry CLI — batch note-to-component transformation tool.
//!
//! Walks a vault of Markdown notes and turns each into a formatted TSX
//! component module, reporting per-document outcomes.

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
