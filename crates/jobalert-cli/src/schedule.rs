//! Cron-driven runs.

use std::sync::Arc;

use jobalert_core::AppConfig;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::run;

/// Registers the pipeline as a cron job and blocks until ctrl-c or SIGTERM.
///
/// Each tick opens its own rendering session and reloads the ledger. A failed
/// tick is logged; the scheduler keeps running.
pub(crate) async fn run_scheduled(pool: PgPool, config: AppConfig, cron: &str) -> anyhow::Result<()> {
    let pool = Arc::new(pool);
    let config = Arc::new(config);

    let mut scheduler = JobScheduler::new().await?;
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting run");
            match run::run_pipeline(&pool, &config).await {
                Ok(summary) => tracing::info!(
                    delivered = summary.delivered(),
                    errored = summary.errored(),
                    "scheduler: run complete"
                ),
                Err(e) => tracing::error!(error = %format!("{e:#}"), "scheduler: run failed"),
            }
        })
    })?;
    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron, "scheduler started");

    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
