mod amount;
mod cli;
mod db;
mod detector;
mod error;
mod fmt;
mod importer;
mod models;
mod parsers;
mod period;
mod settings;
mod sheet;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Init { data_dir, company } => cli::init::run(data_dir, company),
        Commands::Parse {
            file,
            mime,
            report_type,
            compact,
        } => cli::parse::run(&file, mime, report_type.as_deref(), compact),
        Commands::Detect { file, mime } => cli::parse::detect(&file, mime),
        Commands::Import {
            file,
            mime,
            report_type,
        } => cli::import::run(&file, mime.as_deref(), report_type.as_deref()),
        Commands::Imports { report_type } => cli::imports::list(report_type.as_deref()),
        Commands::Show { id, json } => cli::imports::show(id, json),
        Commands::Delete { id } => cli::imports::delete(id),
        Commands::Types => cli::types::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
