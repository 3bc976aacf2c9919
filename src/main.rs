mod cli;
mod db;
mod draft;
mod error;
mod fmt;
mod form;
mod logging;
mod models;
mod picker;
mod settings;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::open_store().and_then(|store| cli::app::run(&store)),
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Add {
            merchant,
            amount,
            category,
            account,
            date,
        }) => cli::transactions::add(merchant, amount, category, account, date),
        Some(Commands::List) => cli::transactions::list(),
        Some(Commands::Edit {
            id,
            merchant,
            amount,
            category,
            account,
            date,
        }) => cli::transactions::edit(&id, merchant, amount, category, account, date),
        Some(Commands::Delete { id, yes }) => cli::transactions::delete(&id, yes),
        Some(Commands::Export { output }) => cli::export::run(output),
        Some(Commands::Backup { output }) => cli::backup::run(output),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
