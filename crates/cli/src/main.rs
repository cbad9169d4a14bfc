use anyhow::Result;
use clap::Parser;
use env_logger::init;
use ift_client_cli::cli::Cli;

fn main() -> Result<()> {
    init();
    Cli::parse().command.run()
}
