use std::sync::Arc;

use itvnotify_core::config::Config;
use itvnotify_core::notify::{IdempotencyStore, InspectionSource, MailSender};

use crate::scheduler::guard::RunGuard;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`] and into the scheduler loop.
///
/// The data provider, mail transport and idempotency ledger sit behind trait
/// objects so tests can swap in in-memory fakes without a database or an
/// SMTP relay.
pub struct AppState {
    pub source: Arc<dyn InspectionSource>,
    pub sender: Arc<dyn MailSender>,
    pub ledger: Arc<dyn IdempotencyStore>,

    /// Parsed configuration, loaded once at startup from environment
    /// variables. The JSON schedule file is not cached here; it is re-read
    /// from `config.schedule_path` on every scheduling decision.
    pub config: Arc<Config>,

    /// The only mutable shared state in the process: minute-granular tick
    /// admission plus the scheduler singleton latch.
    pub guard: RunGuard,
}

impl AppState {
    pub fn new(
        source: Arc<dyn InspectionSource>,
        sender: Arc<dyn MailSender>,
        ledger: Arc<dyn IdempotencyStore>,
        config: Config,
    ) -> Self {
        let guard = RunGuard::new(config.active_worker);
        Self {
            source,
            sender,
            ledger,
            config: Arc::new(config),
            guard,
        }
    }
}
