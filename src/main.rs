//! meditate - a quiet countdown for meditation sessions
//!
//! Usage:
//!   meditate                      Start with a 10 minute session selected
//!   meditate -d 20m               Preselect 20 minutes
//!   meditate -p 5m,10m,25m        Offer a custom set of durations
//!   meditate --log-file m.log     Record transitions for debugging

use anyhow::{Context, Result};
use bubbletea_rs::Program;
use clap::Parser;

use meditation_timer::app::App;
use meditation_timer::config::{self, Cli, Config};
use meditation_timer::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::try_from(cli)?;

    logging::init(config.log_file.as_deref())?;
    let alt_screen = config.alt_screen;
    config::install(config)?;

    let program = Program::<App>::builder()
        .alt_screen(alt_screen)
        .build()
        .context("failed to set up the terminal")?;
    program.run().await.context("timer exited with an error")?;

    tracing::info!("bye");
    Ok(())
}
