mod common;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use itvnotify_server::scheduler::run_scheduler_loop;

use common::{make_state, record, unique_schedule_path, MockSource, RecordingSender};

#[tokio::test]
async fn loop_stops_at_the_next_poll_cycle_on_cancellation() {
    let path = unique_schedule_path(); // no file: defaults, no triggers
    let (state, _, _) = make_state(
        MockSource::new(vec![]),
        RecordingSender::default(),
        &path,
    );

    let token = CancellationToken::new();
    let handle = tokio::spawn(run_scheduler_loop(state, token.clone()));

    token.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop should exit promptly after cancellation")
        .expect("loop task should not panic");
}

#[tokio::test(start_paused = true)]
async fn reminder_tier_fires_a_pass_after_its_interval() {
    let path = unique_schedule_path();
    std::fs::write(
        &path,
        r#"{"cc": [], "cco": [], "repeat_interval_minutes": 1}"#,
    )
    .expect("write schedule file");
    let (state, source, _) = make_state(
        MockSource::new(vec![record("driver@example.com", 10)]),
        RecordingSender::default(),
        &path,
    );

    let token = CancellationToken::new();
    let handle = tokio::spawn(run_scheduler_loop(state, token.clone()));

    // Paused clock auto-advances; the reminder tier is due one interval
    // (60 ticks) after startup. Sends are weekday-dependent, so assert on
    // the fetch, not on deliveries.
    for _ in 0..5_000 {
        if source.fetches() >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(
        source.fetches() >= 1,
        "reminder tier should have run a pass"
    );

    token.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should exit after cancellation")
        .expect("loop task should not panic");
}
