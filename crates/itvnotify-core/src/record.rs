use serde::{Deserialize, Serialize};

/// One vehicle/driver/email row returned by the data provider.
///
/// Records are stateless snapshots re-fetched on every pass; there is no
/// persisted identity or "already notified" marker attached to them. Whether
/// a record is sendable at all is decided by [`InspectionRecord::is_sendable`]
/// and whether it is due today by [`crate::window::is_due`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub vehicle_name: String,
    pub vehicle_description: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_brand: Option<String>,
    /// Next mandatory inspection date, already formatted as dd/mm/yyyy text
    /// by the provider query.
    pub inspection_date: String,
    pub driver_first_name: String,
    pub driver_last_name: String,
    pub recipient_email: String,
    /// `inspection_date - today` in days; negative means overdue.
    pub days_remaining: i64,
}

impl InspectionRecord {
    /// A record without a destination address is skipped, never an error.
    pub fn is_sendable(&self) -> bool {
        !self.recipient_email.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> InspectionRecord {
        InspectionRecord {
            vehicle_name: "1234-ABC".to_string(),
            vehicle_description: None,
            vehicle_type: None,
            vehicle_brand: None,
            inspection_date: "01/10/2026".to_string(),
            driver_first_name: "Ana".to_string(),
            driver_last_name: "Gomez".to_string(),
            recipient_email: email.to_string(),
            days_remaining: 15,
        }
    }

    #[test]
    fn blank_recipient_is_not_sendable() {
        assert!(!record("").is_sendable());
        assert!(!record("   ").is_sendable());
        assert!(record("ana@example.com").is_sendable());
    }
}
