//! `rollcall` - CLI for the attendance recorder
//!
//! This binary translates command-line input into [`AttendanceService`]
//! calls and prints the results.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};

use rollcall::cli::{
    AdminAction, AdminCommand, Cli, Command, ConfigCommand, DashboardCommand, ExportCommand,
    OutputFormat,
};
use rollcall::{
    init_logging, AdminPanel, AttendanceService, CheckInRequest, Config, Error, RecordFilter,
    RecordStore, SqliteStore,
};

/// Exit status for a rejected request (bad input, duplicate, wrong password).
const EXIT_REJECTED: u8 = 1;

/// Exit status for an operational failure (storage, configuration, I/O).
const EXIT_FAILED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<Error>() {
            Some(e) if e.is_rejection() => {
                eprintln!("{e}");
                ExitCode::from(EXIT_REJECTED)
            }
            _ => {
                error!("{err:#}");
                ExitCode::from(EXIT_FAILED)
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    // Validation must work even when the active configuration is broken.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::CheckIn(cmd) => handle_check_in(&config, cmd.into()),
        Command::Dashboard(cmd) => handle_dashboard(&config, &cmd),
        Command::Export(cmd) => handle_export(&config, &cmd),
        Command::Admin(cmd) => handle_admin(&config, cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_service(config: &Config) -> Result<AttendanceService<SqliteStore>> {
    let store = SqliteStore::from_config(config)
        .with_context(|| format!("opening {}", config.database_path().display()))?;
    Ok(AttendanceService::new(store, config.display.clone()))
}

fn handle_check_in(config: &Config, request: CheckInRequest) -> Result<()> {
    let service = open_service(config)?;
    let record = service.check_in(&request)?;
    println!(
        "Check-in successful! {} ({}) at {}",
        record.name,
        record.student_id,
        record.timestamp.format(&config.display.timestamp_format)
    );
    Ok(())
}

fn handle_dashboard(config: &Config, cmd: &DashboardCommand) -> Result<()> {
    let service = open_service(config)?;
    let view = service.dashboard(&RecordFilter::from(&cmd.filter));
    match cmd.format {
        OutputFormat::Table => print!("{}", view.to_table(false)),
        OutputFormat::Json => {
            let rows: Vec<_> = view.records().collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn handle_export(config: &Config, cmd: &ExportCommand) -> Result<()> {
    let service = open_service(config)?;
    let filter = RecordFilter::from(&cmd.filter);

    if cmd.stdout {
        println!("{}", service.export_csv(&filter));
        return Ok(());
    }

    let summary = match &cmd.output {
        Some(path) => service.export_to(&filter, path)?,
        None => service.export_into_dir(&filter, &config.export_dir())?,
    };
    println!(
        "Exported {} records to {}",
        summary.rows,
        summary.path.display()
    );
    Ok(())
}

fn handle_admin(config: &Config, cmd: AdminCommand) -> Result<()> {
    let panel = AdminPanel::login(&cmd.password, &config.admin).map_err(Error::from)?;
    let service = open_service(config)?;

    match cmd.action {
        AdminAction::List => print!("{}", service.admin_view(&panel).to_table(true)),
        AdminAction::Delete { index, yes } => {
            if !yes {
                let target = usize::try_from(index)
                    .ok()
                    .and_then(|i| service.records().get(i).cloned());
                match target {
                    Some(r) => println!(
                        "This will delete record #{index}: {} ({}) on {}.",
                        r.name,
                        r.student_id,
                        r.calendar_day()
                    ),
                    None => println!("This will delete record #{index}."),
                }
                println!("Use --yes to confirm.");
                return Ok(());
            }
            match service.delete(&panel, index) {
                Ok(r) => println!("Deleted {} ({}) from {}.", r.name, r.student_id, r.calendar_day()),
                Err(e) if e.is_stale_index() => {
                    warn!("{}", e);
                    println!("Record #{index} no longer exists. Current records:");
                    print!("{}", service.admin_view(&panel).to_table(true));
                }
                Err(e) => return Err(e.into()),
            }
        }
        AdminAction::Clear { yes } => {
            if yes {
                let cleared = service.clear(&panel)?;
                println!("Cleared {cleared} records.");
            } else {
                println!(
                    "This will delete all {} attendance records.",
                    service.store().load().len()
                );
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let service = open_service(config)?;
    let stats = service.store().stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": service.store().path(),
            "storage_key": service.store().key(),
            "total_records": stats.total_records,
            "oldest_record": stats.oldest_record,
            "newest_record": stats.newest_record,
            "last_saved": stats.last_saved,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let fmt = |ts: Option<chrono::DateTime<chrono::FixedOffset>>| {
            ts.map_or_else(
                || "-".to_string(),
                |t| t.format(&config.display.timestamp_format).to_string(),
            )
        };
        println!("rollcall status");
        println!("---------------");
        println!("Database:      {}", service.store().path().display());
        println!("Storage key:   {}", service.store().key());
        println!("Records:       {}", stats.total_records);
        println!("Oldest:        {}", fmt(stats.oldest_record));
        println!("Newest:        {}", fmt(stats.newest_record));
        println!(
            "Last saved:    {}",
            stats.last_saved.as_deref().unwrap_or("-")
        );
        println!("Size (bytes):  {}", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Storage key:        {}", config.storage.storage_key);
                println!();
                println!("[Display]");
                println!("  Timestamp format:   {}", config.display.timestamp_format);
                println!(
                    "  Empty note:         {}",
                    config.display.empty_note_placeholder
                );
                println!();
                println!("[Export]");
                println!("  Output directory:   {}", config.export_dir().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => return handle_validate(file),
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    Config::load_from(Some(path.clone()))
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}
