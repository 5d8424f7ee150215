use anyhow::Result;
use clap::Parser;
use ekmelos_cli::cli::Cli;
use env_logger::init;

fn main() -> Result<()> {
    init();
    Cli::parse().command.run()
}
