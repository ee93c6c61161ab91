use std::error::Error;

use clap::Parser;
use pintask::cli::commands::Cli;
use pintask::cli::handlers;
use pintask::io::storage::resolve_data_dir;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => launch_tui(&cli),
        Some(_) => handlers::dispatch(cli),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn launch_tui(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    pintask::tui::run(&data_dir)
}
