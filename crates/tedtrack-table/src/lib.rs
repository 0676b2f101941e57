//! # TedTrack Table
//!
//! Spreadsheet intake, deadline derivation, and artifact persistence
//! for TED transfer agreements.

pub mod loader;
pub mod processor;
pub mod record;
pub mod store;

pub use loader::{RawTable, load_bytes, load_path};
pub use processor::{ACCOUNTING_OFFSET_DAYS, WARNING_OFFSET_DAYS, process};
pub use record::{COLUMN_LABELS, DATE_FORMAT, DeadlineColumn, Record, Table, format_date};
pub use store::TableStore;
