//! Shared fakes for the integration tests: an in-memory inspection source
//! and a recording mail sender, wired into a real `AppState`.
#![allow(dead_code)] // each test binary uses a different subset of helpers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use itvnotify_core::config::{Config, SmtpConfig};
use itvnotify_core::error::{DataSourceError, SendError};
use itvnotify_core::notify::{InspectionSource, MailSender, NoopStore};
use itvnotify_core::record::InspectionRecord;
use itvnotify_server::state::AppState;

pub fn record(email: &str, days_remaining: i64) -> InspectionRecord {
    InspectionRecord {
        vehicle_name: format!("VEH-{days_remaining}"),
        vehicle_description: Some("furgoneta de reparto".to_string()),
        vehicle_type: Some("furgoneta".to_string()),
        vehicle_brand: Some("Renault".to_string()),
        inspection_date: "15/09/2026".to_string(),
        driver_first_name: "Ana".to_string(),
        driver_last_name: "Gomez".to_string(),
        recipient_email: email.to_string(),
        days_remaining,
    }
}

pub struct MockSource {
    records: Vec<InspectionRecord>,
    fail: bool,
    fetches: AtomicUsize,
}

impl MockSource {
    pub fn new(records: Vec<InspectionRecord>) -> Self {
        Self {
            records,
            fail: false,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InspectionSource for MockSource {
    async fn fetch_due_candidates(&self) -> Result<Vec<InspectionRecord>, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DataSourceError::Connection("mock outage".to_string()));
        }
        Ok(self.records.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMail>>,
    /// Recipients whose sends should fail, to exercise per-recipient
    /// isolation.
    pub fail_recipients: Vec<String>,
}

impl RecordingSender {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_recipients: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MailSender for RecordingSender {
    async fn send(
        &self,
        record: &InspectionRecord,
        cc: &[String],
        bcc: &[String],
    ) -> Result<(), SendError> {
        if self.fail_recipients.contains(&record.recipient_email) {
            return Err(SendError::Transport("mock relay refused".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(SentMail {
                recipient: record.recipient_email.clone(),
                cc: cc.to_vec(),
                bcc: bcc.to_vec(),
            });
        Ok(())
    }
}

pub fn unique_schedule_path() -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("unix time")
        .as_nanos();
    std::env::temp_dir().join(format!("itvnotify-test-schedule-{nanos}.json"))
}

pub fn test_config(schedule_path: &std::path::Path) -> Config {
    Config {
        port: 0,
        schedule_path: schedule_path.to_string_lossy().to_string(),
        database_url: "mysql://unused".to_string(),
        smtp: SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            from: "notificaciones@example.com".to_string(),
            noop: true,
            timeout_seconds: 60,
        },
        active_worker: true,
        dedup_per_day: false,
    }
}

pub fn make_state(
    source: MockSource,
    sender: RecordingSender,
    schedule_path: &std::path::Path,
) -> (Arc<AppState>, Arc<MockSource>, Arc<RecordingSender>) {
    let source = Arc::new(source);
    let sender = Arc::new(sender);
    let state = Arc::new(AppState::new(
        Arc::clone(&source) as Arc<dyn InspectionSource>,
        Arc::clone(&sender) as Arc<dyn MailSender>,
        Arc::new(NoopStore),
        test_config(schedule_path),
    ));
    (state, source, sender)
}
