//! MySQL implementation of the inspection data provider.
//!
//! Executes the fixed join against the CRM schema and maps rows to
//! [`InspectionRecord`]. The query contract is load-bearing: the date is
//! formatted server-side as dd/mm/yyyy, `dias_restantes` comes from
//! `DATEDIFF`, candidates are limited to vehicles overdue or within 32 days,
//! and soft-deleted vehicles/assignments are excluded.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tracing::debug;

use itvnotify_core::error::DataSourceError;
use itvnotify_core::notify::InspectionSource;
use itvnotify_core::record::InspectionRecord;

const CANDIDATE_QUERY: &str = r#"
SELECT
    vehiculo.name AS vehicle_name,
    vehiculo.description AS vehicle_description,
    vehiculo.tipo AS vehicle_type,
    vehiculo.marca AS vehicle_brand,
    DATE_FORMAT(vehiculo.fecha_prxima_i_t_v, '%d/%m/%Y') AS inspection_date,
    conductor.first_name AS driver_first_name,
    conductor.last_name AS driver_last_name,
    email_address.name AS recipient_email,
    DATEDIFF(vehiculo.fecha_prxima_i_t_v, CURDATE()) AS days_remaining
FROM comercialcrm.vehiculo
INNER JOIN comercialcrm.vehiculo_conductor
    ON vehiculo.id = vehiculo_conductor.vehiculo_id
INNER JOIN comercialcrm.conductor
    ON conductor.id = vehiculo_conductor.conductor_id
INNER JOIN comercialcrm.`user`
    ON conductor.id = `user`.conductor_id
INNER JOIN comercialcrm.entity_email_address
    ON `user`.id = entity_email_address.entity_id
    AND entity_email_address.entity_type = 'User'
INNER JOIN comercialcrm.email_address
    ON entity_email_address.email_address_id = email_address.id
WHERE
    (fecha_prxima_i_t_v < CURDATE() OR fecha_prxima_i_t_v < CURDATE() + INTERVAL 32 DAY)
    AND vehiculo.deleted = 0
    AND vehiculo_conductor.deleted = 0
"#;

pub struct MySqlInspectionSource {
    pool: MySqlPool,
}

impl MySqlInspectionSource {
    /// Connects lazily: the pool is created immediately but no connection is
    /// opened until the first pass, so the process starts even while the
    /// database is unreachable.
    pub fn connect_lazy(database_url: &str) -> Result<Self, DataSourceError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(database_url)
            .map_err(|e| DataSourceError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &MySqlRow) -> Result<InspectionRecord, DataSourceError> {
    let get_str = |name: &str| -> Result<String, DataSourceError> {
        row.try_get::<Option<String>, _>(name)
            .map(Option::unwrap_or_default)
            .map_err(|e| DataSourceError::Decode(format!("{name}: {e}")))
    };
    Ok(InspectionRecord {
        vehicle_name: get_str("vehicle_name")?,
        vehicle_description: row
            .try_get("vehicle_description")
            .map_err(|e| DataSourceError::Decode(e.to_string()))?,
        vehicle_type: row
            .try_get("vehicle_type")
            .map_err(|e| DataSourceError::Decode(e.to_string()))?,
        vehicle_brand: row
            .try_get("vehicle_brand")
            .map_err(|e| DataSourceError::Decode(e.to_string()))?,
        inspection_date: get_str("inspection_date")?,
        driver_first_name: get_str("driver_first_name")?,
        driver_last_name: get_str("driver_last_name")?,
        recipient_email: get_str("recipient_email")?,
        days_remaining: row
            .try_get::<i64, _>("days_remaining")
            .map_err(|e| DataSourceError::Decode(format!("days_remaining: {e}")))?,
    })
}

#[async_trait]
impl InspectionSource for MySqlInspectionSource {
    async fn fetch_due_candidates(&self) -> Result<Vec<InspectionRecord>, DataSourceError> {
        let rows = sqlx::query(CANDIDATE_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                    DataSourceError::Connection(e.to_string())
                }
                other => DataSourceError::Query(other.to_string()),
            })?;
        debug!(rows = rows.len(), "candidate query returned");
        rows.iter().map(map_row).collect()
    }
}
