mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod schedule;
mod scheduler;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Add(args) => cli::add::run(&args),
        Commands::List { all } => cli::list::run(all),
        Commands::Due { as_of } => cli::due::run(as_of.as_deref()),
        Commands::Run { as_of } => cli::run::run(as_of.as_deref()),
        Commands::History { id } => cli::history::run(id.as_deref()),
        Commands::Enable { id } => cli::toggle::run(&id, true),
        Commands::Disable { id } => cli::toggle::run(&id, false),
        Commands::Upcoming { as_of } => cli::upcoming::run(as_of.as_deref()),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
