//! # TedTrack Core
//!
//! Shared foundation for the TED agreement deadline tracker:
//! configuration, error types, and operator session state.

pub mod config;
pub mod error;
pub mod session;

pub use config::{
    MailConfig, OperatorConfig, ScheduleConfig, SessionConfig, StorageConfig, TedTrackConfig,
};
pub use error::{Result, TedTrackError};
pub use session::{Session, SessionEvent, reduce};
