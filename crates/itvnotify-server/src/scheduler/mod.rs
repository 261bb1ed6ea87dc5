//! Scheduler loop: a single background task polling once a second for
//! elapsed triggers.
//!
//! Two trigger sources share one path: a fixed daily wall-clock time and an
//! optional repeating reminder tier. Every firing goes through
//! [`guard::RunGuard::admit_tick`], so however many triggers elapse in the
//! same minute, at most one pass runs. The schedule file is re-read on every
//! tick; edits to CC/BCC or trigger times take effect without a restart.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use itvnotify_core::schedule::ScheduleConfig;

use crate::state::AppState;

pub mod delivery;
pub mod guard;
pub mod pass;
pub mod template;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runs until `shutdown` is cancelled. Spawn exactly once, gated by
/// [`guard::RunGuard::start_once`].
pub async fn run_scheduler_loop(state: Arc<AppState>, shutdown: CancellationToken) {
    info!(schedule_path = %state.config.schedule_path, "scheduler loop started");
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The reminder tier counts from the last completed pass, so the first
    // repeat fires one full interval after startup.
    let mut last_pass = tokio::time::Instant::now();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("scheduler loop stopping");
                return;
            }
            _ = interval.tick() => {}
        }

        let schedule = ScheduleConfig::load_or_default(Path::new(&state.config.schedule_path));
        let mut triggered = false;

        if let Some(send_time) = schedule.daily_send_time {
            let now = Local::now().time();
            if now.hour() == send_time.hour() && now.minute() == send_time.minute() {
                triggered = true;
            }
        }
        if let Some(minutes) = schedule.repeat_interval_minutes {
            if last_pass.elapsed() >= Duration::from_secs(u64::from(minutes) * 60) {
                triggered = true;
            }
        }
        if !triggered {
            continue;
        }

        if !state.guard.admit_tick(Utc::now()) {
            // Expected suppression: the same minute's trigger polling again,
            // or a second trigger source firing concurrently.
            debug!("tick rejected, already ran this minute");
            continue;
        }

        match pass::run_notification_pass(&state).await {
            Ok(sent) => info!(sent, "scheduled notification pass completed"),
            Err(e) => error!(error = %e, "scheduled notification pass aborted"),
        }
        last_pass = tokio::time::Instant::now();
    }
}
