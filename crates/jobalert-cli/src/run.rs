//! One full pass over every subscriber.

use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use jobalert_core::{load_vocabulary, AppConfig, DetailSourceKind};
use jobalert_notify::SmtpMailer;
use jobalert_pipeline::{
    Collaborators, Orchestrator, PgSubscriberStore, PipelineSettings, RunSummary,
    SubscriberStore,
};
use jobalert_scraper::{
    DescriptionSource, HttpDetailFetcher, RenderedDetailFetcher, Renderer, WebDriverRenderer,
};
use sqlx::PgPool;

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Runs the pipeline once. The rendering session is released before this
/// returns, whatever the outcome.
pub(crate) async fn run_pipeline(pool: &PgPool, config: &AppConfig) -> anyhow::Result<RunSummary> {
    let credentials = config
        .smtp
        .clone()
        .context("SENDER_EMAIL and EMAIL_PASSWORD must be set to send digests")?;
    let vocabulary = load_vocabulary(config.skills_path.as_deref())?;
    let http_details = match config.detail_source {
        DetailSourceKind::Http => Some(HttpDetailFetcher::new(
            config.http_timeout_secs,
            &config.http_user_agent,
            config.http_max_retries,
            config.http_retry_backoff_base_secs,
        )?),
        DetailSourceKind::Browser => None,
    };
    let mailer = SmtpMailer::new(&config.smtp_host, config.smtp_port, credentials);
    let store = PgSubscriberStore::new(pool.clone());

    let renderer = WebDriverRenderer::connect(&config.webdriver_url)
        .await
        .with_context(|| format!("failed to open rendering session at {}", config.webdriver_url))?;

    let rendered_details;
    let details: &dyn DescriptionSource = if let Some(fetcher) = &http_details {
        fetcher
    } else {
        rendered_details = RenderedDetailFetcher::new(
            &renderer,
            Duration::from_secs(config.detail_settle_secs),
        );
        &rendered_details
    };

    let deps = Collaborators {
        renderer: &renderer,
        details,
        mailer: &mailer,
        store: &store,
    };
    let orchestrator =
        match Orchestrator::open(deps, vocabulary, PipelineSettings::from_app_config(config)) {
            Ok(orchestrator) => orchestrator,
            Err(e) => {
                if let Err(close_err) = renderer.close().await {
                    tracing::warn!(error = %close_err, "failed to release rendering session");
                }
                return Err(e.into());
            }
        };

    Ok(orchestrator.run_to_completion(today()).await?)
}

/// Lists subscribers with today's throttle decision. No rendering session is
/// opened and no mail is sent.
pub(crate) async fn dry_run(pool: &PgPool, today: NaiveDate) -> anyhow::Result<()> {
    let store = PgSubscriberStore::new(pool.clone());
    let subscribers = store.list_subscribers().await?;

    let mut eligible = 0usize;
    for subscriber in &subscribers {
        let decision = if subscriber.notified_on(today) {
            "throttled"
        } else {
            eligible += 1;
            "eligible"
        };
        println!(
            "{:<40} {:<10} {} / {}",
            subscriber.email, decision, subscriber.keywords, subscriber.location
        );
    }

    tracing::info!(
        subscribers = subscribers.len(),
        eligible,
        %today,
        "dry run complete"
    );
    Ok(())
}

pub(crate) fn print_summary(summary: &RunSummary) {
    for report in &summary.reports {
        println!(
            "{:<40} {:<10} candidates={} seen={} matched={} delivery={:?}",
            report.email,
            report.state(),
            report.candidates,
            report.ledger_hits,
            report.matched,
            report.delivery
        );
    }
    println!(
        "{} subscribers: {} delivered, {} failed, {} throttled, {} errored",
        summary.reports.len(),
        summary.delivered(),
        summary.failed_deliveries(),
        summary.throttled(),
        summary.errored()
    );
}
