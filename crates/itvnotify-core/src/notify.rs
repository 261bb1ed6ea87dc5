//! Collaborator seams: the data provider, the mail transport and the
//! optional idempotency ledger are all injected behind these traits so the
//! scheduler and the decision logic can be exercised without a database or
//! an SMTP relay.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{DataSourceError, SendError};
use crate::record::InspectionRecord;

/// Fetches the candidate rows for one pass: vehicles whose next inspection is
/// overdue or within 32 days, with their assigned driver and email address.
#[async_trait]
pub trait InspectionSource: Send + Sync {
    async fn fetch_due_candidates(&self) -> Result<Vec<InspectionRecord>, DataSourceError>;
}

/// Dispatches one notification per due record. CC/BCC lists come from the
/// schedule config and are applied verbatim, order preserved.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(
        &self,
        record: &InspectionRecord,
        cc: &[String],
        bcc: &[String],
    ) -> Result<(), SendError>;
}

/// Optional "already sent" ledger.
///
/// The original system had none: it relied on the daily trigger running once
/// and the exact-value milestone matches. That gap is made explicit here as
/// an injectable store rather than silently preserved. The default is still
/// [`NoopStore`] so the intentional nagging behaviour of the urgency window
/// and the reminder tier is unchanged unless per-day suppression is enabled.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Returns `true` the first time `key` is seen, `false` afterwards.
    /// Check and record are one atomic step.
    async fn check_and_record(&self, key: &str) -> bool;
}

/// Builds the ledger key for one (record, day) occasion.
pub fn delivery_key(record: &InspectionRecord, today: NaiveDate) -> String {
    format!(
        "{}:{}:{}",
        record.recipient_email.trim(),
        record.vehicle_name,
        today.format("%Y%m%d")
    )
}

/// Ledger that never suppresses anything; matches the source system.
#[derive(Debug, Default)]
pub struct NoopStore;

#[async_trait]
impl IdempotencyStore for NoopStore {
    async fn check_and_record(&self, _key: &str) -> bool {
        true
    }
}

/// Process-local ledger: at most one send per key for the process lifetime.
/// Keys embed the calendar day, so suppression is effectively per-day.
#[derive(Debug, Default)]
pub struct InMemoryDailyStore {
    seen: Mutex<HashSet<String>>,
}

#[async_trait]
impl IdempotencyStore for InMemoryDailyStore {
    async fn check_and_record(&self, key: &str) -> bool {
        let mut seen = self
            .seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        seen.insert(key.to_string())
    }
}
