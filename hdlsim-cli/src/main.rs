//! Hdlsim CLI - Command-line interface
//!
//! Runs built-in scenario models through the event-driven driver loop.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "hdlsim")]
#[command(about = "Event-driven HDL simulation driver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::handle_command(cli.command)
}
