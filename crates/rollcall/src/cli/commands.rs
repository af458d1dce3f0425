//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::checkin::CheckInRequest;
use crate::query::RecordFilter;

/// Check-in command arguments.
#[derive(Debug, Args)]
pub struct CheckInCommand {
    /// Student name
    #[arg(short, long)]
    pub name: String,

    /// Student ID
    #[arg(short, long)]
    pub student_id: String,

    /// Optional note (e.g. "late")
    #[arg(long)]
    pub note: Option<String>,
}

impl From<CheckInCommand> for CheckInRequest {
    fn from(cmd: CheckInCommand) -> Self {
        Self {
            name: cmd.name,
            student_id: cmd.student_id,
            note: cmd.note,
        }
    }
}

/// Record filters shared by the dashboard and export commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only show check-ins on this day (YYYY-MM-DD)
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Only show students whose name contains this text (case-insensitive)
    #[arg(short, long, value_name = "PATTERN")]
    pub name: Option<String>,
}

impl From<&FilterArgs> for RecordFilter {
    fn from(args: &FilterArgs) -> Self {
        Self {
            date: args.date,
            name_pattern: args.name.clone(),
        }
    }
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Record filters
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Record filters; without any, every record is exported
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Write to this file instead of `attendance-<today>.csv` in the export directory
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the CSV to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Admin command arguments.
#[derive(Debug, Args)]
pub struct AdminCommand {
    /// Admin password
    #[arg(short, long)]
    pub password: String,

    /// Admin action
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Actions available after admin login.
#[derive(Debug, Subcommand)]
pub enum AdminAction {
    /// List all records with their row index
    List,

    /// Delete the record at the given row index
    Delete {
        /// Row index as shown by `admin list`
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every record
    Clear {
        /// Confirm clearing all records
        #[arg(short, long)]
        yes: bool,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// JSON array of rows
    Json,
}
