//! # TedTrack Scheduler
//!
//! Daily deadline checks and the single-task lifecycle around them.
//!
//! ## Architecture
//! ```text
//! TaskSupervisor (start/stop/status, one task at most)
//!   └── run_loop (tokio task, watch-channel shutdown)
//!         ├── immediate tick on start
//!         └── daily at HH:MM local, clock polled per interval
//!               └── run_tick: load artifact → run_once
//!                     ├── Data de prestação de contas
//!                     ├── Data para alerta
//!                     └── Vigência fim
//! ```

pub mod engine;
pub mod supervisor;

pub use engine::{
    ScheduleContext, Triggered, next_daily_trigger, run_loop, run_once, run_tick, today_str,
};
pub use supervisor::{TaskStatus, TaskSupervisor};
