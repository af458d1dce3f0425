//! `rollcall` - Student attendance check-in recorder
//!
//! This library provides the attendance record store, the filter engine and
//! the check-in, dashboard/export and admin workflows. The `rollcall` binary
//! is a thin command-line front end over [`AttendanceService`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod admin;
pub mod checkin;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod record;
pub mod service;
pub mod storage;
pub mod view;

pub use admin::{AdminError, AdminPanel};
pub use checkin::{CheckInError, CheckInRequest};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use query::RecordFilter;
pub use record::{AttendanceRecord, RecordCollection};
pub use service::{AttendanceService, ExportSummary};
pub use storage::{MemoryStore, RecordStore, SqliteStore, StoreStats};
pub use view::TabularView;
