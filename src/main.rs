use clap::Parser;
use color_eyre::Result;
use std::io;
use std::path::PathBuf;
use tdl::{
    cli::{Cli, Commands},
    Config, KeyValueStore, MemoryStorage, Profile, SqliteStorage, TodoStore,
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config and storage apart from the real ones
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config {
        Some(ref path) => Config::load_from_path(&tdl::utils::expand_path(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    let storage_path = config.get_storage_path();

    // Logs sit next to the storage file when there is no data directory
    let log_dir = tdl::utils::get_data_dir(profile)
        .or_else(|| storage_path.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs");
    let _logger = match tdl::logging::init_logging(config.effective_log_level(), &log_dir) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("warning: logging disabled: {}", err);
            None
        }
    };

    let storage: Box<dyn KeyValueStore> = if cli.ephemeral {
        log::info!("event=storage_open module=main backend=memory");
        Box::new(MemoryStorage::new())
    } else {
        log::info!(
            "event=storage_open module=main backend=sqlite path={}",
            storage_path.display()
        );
        Box::new(SqliteStorage::new(
            storage_path
                .to_str()
                .ok_or_else(|| color_eyre::eyre::eyre!("Storage path contains invalid UTF-8"))?,
        )?)
    };

    let mut store = TodoStore::open(storage, config.storage_key.clone());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            // The TUI owns the terminal; release the locks first
            drop(out);
            drop(input);
            let app = tdl::tui::App::new(config, store);
            tdl::tui::run_event_loop(app)?;
        }
        Commands::Add { name, date } => {
            tdl::cli::handle_add(name, date, &mut store, &mut out)?;
        }
        Commands::List { json } => {
            tdl::cli::handle_list(json, &store, &mut out)?;
        }
        Commands::Check { target } => {
            tdl::cli::handle_set_checked(&target, true, &mut store, &mut out)?;
        }
        Commands::Uncheck { target } => {
            tdl::cli::handle_set_checked(&target, false, &mut store, &mut out)?;
        }
        Commands::Edit { target, name, date, checked } => {
            tdl::cli::handle_edit(&target, name, date, checked, &mut store, &mut out)?;
        }
        Commands::Delete { target, yes } => {
            tdl::cli::handle_delete(&target, yes, &mut store, &mut input, &mut out)?;
        }
        Commands::Reset { yes } => {
            tdl::cli::handle_reset(yes, &mut store, &mut input, &mut out)?;
        }
    }

    Ok(())
}
