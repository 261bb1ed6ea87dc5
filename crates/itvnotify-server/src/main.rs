use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use itvnotify_core::config::Config;
use itvnotify_core::notify::{IdempotencyStore, InMemoryDailyStore, NoopStore};
use itvnotify_mysql::MySqlInspectionSource;
use itvnotify_server::scheduler::delivery::SmtpMailSender;
use itvnotify_server::scheduler::run_scheduler_loop;
use itvnotify_server::state::AppState;

/// `itvnotify health` — liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$ITVNOTIFY_PORT/`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("ITVNOTIFY_PORT").unwrap_or_else(|_| "5000".to_string());
    let url = format!("http://localhost:{}/", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Health-check subcommand — handled before anything else so the binary
    // stays fast when used as a container healthcheck probe.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Initialise structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("itvnotify=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Lazy pool: the process comes up even while the CRM database is down;
    // a pass simply aborts until it is reachable again.
    let source = MySqlInspectionSource::connect_lazy(&cfg.database_url)
        .map_err(|e| anyhow::anyhow!(e))?;
    let sender = SmtpMailSender::new(&cfg.smtp).map_err(|e| anyhow::anyhow!(e))?;
    let ledger: Arc<dyn IdempotencyStore> = if cfg.dedup_per_day {
        info!("per-day duplicate suppression enabled");
        Arc::new(InMemoryDailyStore::default())
    } else {
        Arc::new(NoopStore)
    };

    let state = Arc::new(AppState::new(
        Arc::new(source),
        Arc::new(sender),
        ledger,
        cfg.clone(),
    ));

    let shutdown = CancellationToken::new();
    if state.guard.start_once() {
        let state = Arc::clone(&state);
        let token = shutdown.clone();
        tokio::spawn(async move {
            run_scheduler_loop(state, token).await;
        });
    } else {
        info!("scheduler loop not started in this process image");
    }

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = itvnotify_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "itvnotify listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let shutdown_for_serve = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            shutdown_for_serve.cancel();
        })
        .await?;

    // Stop the scheduler at its next poll cycle before exiting.
    shutdown.cancel();

    Ok(())
}
