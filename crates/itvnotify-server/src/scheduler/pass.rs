//! One notification pass: fetch → evaluate → send.
//!
//! A fetch failure aborts the whole pass; a send failure is isolated to its
//! recipient and only lowers the success count. Records are processed in
//! provider order, sequentially, to keep the transport simple.

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, info, warn};

use itvnotify_core::error::DataSourceError;
use itvnotify_core::notify::delivery_key;
use itvnotify_core::schedule::ScheduleConfig;
use itvnotify_core::window::is_due;

use crate::state::AppState;

/// Runs a pass for the current local date. Returns the number of successful
/// deliveries.
pub async fn run_notification_pass(state: &Arc<AppState>) -> Result<usize, DataSourceError> {
    run_pass_on(state, Local::now().date_naive()).await
}

/// Date-injectable pass body; the weekday pair is derived from `today` so the
/// window logic can be tested against fixed dates.
pub async fn run_pass_on(
    state: &Arc<AppState>,
    today: NaiveDate,
) -> Result<usize, DataSourceError> {
    let schedule = ScheduleConfig::load_or_default(Path::new(&state.config.schedule_path));
    let records = state.source.fetch_due_candidates().await?;
    info!(candidates = records.len(), "fetched inspection candidates");

    let weekday_today = today.weekday().num_days_from_monday();
    let weekday_yesterday = (today - chrono::Duration::days(1))
        .weekday()
        .num_days_from_monday();

    let mut sent = 0usize;
    for record in &records {
        if !record.is_sendable() {
            debug!(vehicle = %record.vehicle_name, "record has no recipient address, skipped");
            continue;
        }
        if !is_due(record.days_remaining, weekday_today, weekday_yesterday) {
            continue;
        }
        let key = delivery_key(record, today);
        if !state.ledger.check_and_record(&key).await {
            debug!(
                recipient = %record.recipient_email,
                vehicle = %record.vehicle_name,
                "occasion already attempted today, suppressed by ledger"
            );
            continue;
        }
        match state
            .sender
            .send(record, &schedule.cc, &schedule.bcc)
            .await
        {
            Ok(()) => {
                sent += 1;
                info!(
                    recipient = %record.recipient_email,
                    vehicle = %record.vehicle_name,
                    days_remaining = record.days_remaining,
                    "notification sent"
                );
            }
            Err(e) => {
                warn!(
                    recipient = %record.recipient_email,
                    vehicle = %record.vehicle_name,
                    error = %e,
                    "notification delivery failed"
                );
            }
        }
    }

    info!(sent, "notification pass finished");
    Ok(sent)
}
