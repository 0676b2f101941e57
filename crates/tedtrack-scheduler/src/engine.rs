//! Deadline check engine.
//!
//! A tick loads the saved artifact and checks the three deadline
//! columns in priority order against today's date; each matching
//! column produces one bundled notification. The loop fires once
//! immediately on start, then daily at the configured local time,
//! polling the clock once per interval.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use tokio::sync::watch;

use tedtrack_notify::{Notifier, compose, render_table};
use tedtrack_table::{DeadlineColumn, Table, TableStore, format_date};

/// One notification produced by a tick.
#[derive(Debug, Clone)]
pub struct Triggered {
    pub column: DeadlineColumn,
    /// Number of records bundled into the notification.
    pub matches: usize,
    pub body: String,
    /// False when composition succeeded but delivery failed.
    pub sent: bool,
}

/// Today's date in display form.
pub fn today_str() -> String {
    format_date(Local::now().date_naive())
}

/// Check every deadline column against `today`, sending one bundled
/// notification per matching column. A send failure is logged and the
/// remaining columns still run.
pub async fn run_once(table: &Table, today: &str, notifier: &dyn Notifier) -> Vec<Triggered> {
    let mut triggered = Vec::new();
    for column in DeadlineColumn::PRIORITY {
        let matches = table.matching(column, today);
        if matches.is_empty() {
            continue;
        }

        tracing::info!("🔔 {} record(s) due on '{column}' ({today})", matches.len());
        let body = compose(column.label(), &render_table(&matches));
        let sent = match notifier.notify(column.label(), &body).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("⚠️ Failed to send '{column}' notification: {e}");
                false
            }
        };

        triggered.push(Triggered {
            column,
            matches: matches.len(),
            body,
            sent,
        });
    }
    triggered
}

/// One scheduled check: load the artifact and run today's column
/// checks. A missing artifact is a quiet no-op.
pub async fn run_tick(store: &TableStore, notifier: &dyn Notifier) -> Vec<Triggered> {
    let Some(table) = store.load() else {
        tracing::debug!("📭 No artifact to check");
        return Vec::new();
    };
    run_once(&table, &today_str(), notifier).await
}

/// Everything a running check loop needs.
#[derive(Clone)]
pub struct ScheduleContext {
    pub store: TableStore,
    pub notifier: Arc<dyn Notifier>,
    /// Daily check time, "HH:MM" local.
    pub daily_at: String,
    pub poll_interval_secs: u64,
}

impl ScheduleContext {
    fn daily_time(&self) -> NaiveTime {
        match NaiveTime::parse_from_str(&self.daily_at, "%H:%M") {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("⚠️ Invalid daily_at '{}' ({e}), using 06:00", self.daily_at);
                NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN)
            }
        }
    }
}

/// First instant at wall-clock time `at` strictly after `after`.
pub fn next_daily_trigger(after: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let candidate = after.date().and_time(at);
    if candidate > after {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}

/// Run the check loop until `shutdown` flips.
pub async fn run_loop(ctx: ScheduleContext, mut shutdown: watch::Receiver<bool>) {
    let at = ctx.daily_time();
    tracing::info!(
        "⏰ Deadline checks scheduled daily at {} (poll every {}s)",
        at.format("%H:%M"),
        ctx.poll_interval_secs
    );

    run_tick(&ctx.store, ctx.notifier.as_ref()).await;
    let mut next_due = next_daily_trigger(Local::now().naive_local(), at);

    let mut poll = tokio::time::interval(StdDuration::from_secs(ctx.poll_interval_secs.max(1)));
    poll.tick().await; // the interval's first tick completes immediately

    loop {
        tokio::select! {
            _ = poll.tick() => {
                let now = Local::now().naive_local();
                if now >= next_due {
                    run_tick(&ctx.store, ctx.notifier.as_ref()).await;
                    next_due = next_daily_trigger(now, at);
                }
            }
            _ = shutdown.changed() => {
                tracing::info!("🛑 Check loop stopping");
                break;
            }
        }
    }
}
