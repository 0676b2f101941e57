//! # TedTrack Notify
//!
//! Notification composition and SMTP delivery.

pub mod composer;
pub mod mailer;

pub use composer::{compose, render_table};
pub use mailer::{LogNotifier, Notifier, SmtpNotifier, subject_line};
