//! Command-line interface for rollcall.
//!
//! This module provides the CLI structure for the `rollcall` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminAction, AdminCommand, CheckInCommand, ConfigCommand, DashboardCommand, ExportCommand,
    FilterArgs, OutputFormat, StatusCommand,
};

use crate::logging::Verbosity;

/// rollcall - Record and review student attendance
///
/// Students check in once per day; teachers review the dashboard, export it
/// as CSV, and remove records from the password-protected admin panel.
#[derive(Debug, Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a student in for today
    #[command(name = "checkin")]
    CheckIn(CheckInCommand),

    /// Show the attendance dashboard
    Dashboard(DashboardCommand),

    /// Export attendance as CSV
    Export(ExportCommand),

    /// Delete records (password required)
    Admin(AdminCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "rollcall");
    }

    #[test]
    fn test_parse_checkin() {
        let cli = parse(&["rollcall", "checkin", "--name", "Ana Li", "-s", "S1", "--note", "late"]);
        let Command::CheckIn(cmd) = cli.command else {
            panic!("expected checkin");
        };
        assert_eq!(cmd.name, "Ana Li");
        assert_eq!(cmd.student_id, "S1");
        assert_eq!(cmd.note.as_deref(), Some("late"));
    }

    #[test]
    fn test_parse_checkin_requires_name() {
        assert!(Cli::try_parse_from(["rollcall", "checkin", "--student-id", "S1"]).is_err());
    }

    #[test]
    fn test_parse_dashboard_filters() {
        let cli = parse(&["rollcall", "dashboard", "--date", "2026-10-19", "-n", "ana", "-f", "json"]);
        let Command::Dashboard(cmd) = cli.command else {
            panic!("expected dashboard");
        };
        assert_eq!(
            cmd.filter.date,
            chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
        );
        assert_eq!(cmd.filter.name.as_deref(), Some("ana"));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_dashboard_rejects_bad_date() {
        assert!(Cli::try_parse_from(["rollcall", "dashboard", "--date", "19/10/2026"]).is_err());
    }

    #[test]
    fn test_parse_export() {
        let cli = parse(&["rollcall", "export", "-o", "/tmp/out.csv"]);
        let Command::Export(cmd) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(cmd.output, Some(PathBuf::from("/tmp/out.csv")));
        assert!(!cmd.stdout);
    }

    #[test]
    fn test_parse_export_stdout_conflicts_with_output() {
        assert!(Cli::try_parse_from(["rollcall", "export", "--stdout", "-o", "x.csv"]).is_err());
    }

    #[test]
    fn test_parse_admin_delete() {
        let cli = parse(&["rollcall", "admin", "-p", "admin123", "delete", "2", "--yes"]);
        let Command::Admin(cmd) = cli.command else {
            panic!("expected admin");
        };
        assert_eq!(cmd.password, "admin123");
        assert!(matches!(
            cmd.action,
            AdminAction::Delete { index: 2, yes: true }
        ));
    }

    #[test]
    fn test_parse_admin_delete_negative_index() {
        let cli = parse(&["rollcall", "admin", "-p", "x", "delete", "-1"]);
        let Command::Admin(cmd) = cli.command else {
            panic!("expected admin");
        };
        assert!(matches!(
            cmd.action,
            AdminAction::Delete { index: -1, yes: false }
        ));
    }

    #[test]
    fn test_parse_admin_requires_password() {
        assert!(Cli::try_parse_from(["rollcall", "admin", "clear"]).is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["rollcall", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["rollcall", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["rollcall", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["rollcall", "-vv", "status"]).verbosity(), Verbosity::Trace);
        assert_eq!(parse(&["rollcall", "-q", "status"]).verbosity(), Verbosity::Quiet);
    }
}
