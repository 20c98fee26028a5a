//! Sequential per-subscriber run loop.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use jobalert_core::{AppConfig, MatchedPosting, SkillVocabulary, Subscriber};
use jobalert_notify::{compose_digest, notify, Mailer};
use jobalert_scraper::{DescriptionSource, HarvestSettings, Harvester, Renderer};

use crate::error::{PipelineError, SubscriberError};
use crate::ledger::SeenLedger;
use crate::state::{Delivery, RunSummary, SubscriberReport, SubscriberState};
use crate::store::SubscriberStore;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub harvest: HarvestSettings,
    pub ledger_path: PathBuf,
    /// Pause after each subscriber that was not throttled.
    pub subscriber_delay: Duration,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            harvest: HarvestSettings::from_app_config(config),
            ledger_path: config.ledger_path.clone(),
            subscriber_delay: Duration::from_secs(config.subscriber_delay_secs),
        }
    }
}

/// External capabilities a run is driven through.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub renderer: &'a dyn Renderer,
    pub details: &'a dyn DescriptionSource,
    pub mailer: &'a dyn Mailer,
    pub store: &'a dyn SubscriberStore,
}

/// Walks every subscriber through harvest, match, and notify, one at a time,
/// over a single shared rendering session.
pub struct Orchestrator<'a> {
    deps: Collaborators<'a>,
    harvester: Harvester<'a>,
    ledger: SeenLedger,
    vocabulary: SkillVocabulary,
    subscriber_delay: Duration,
}

impl<'a> Orchestrator<'a> {
    /// Builds an orchestrator, loading the seen-posting ledger from
    /// `settings.ledger_path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Ledger`] if the ledger file exists but cannot
    /// be read.
    pub fn open(
        deps: Collaborators<'a>,
        vocabulary: SkillVocabulary,
        settings: PipelineSettings,
    ) -> Result<Self, PipelineError> {
        let ledger = SeenLedger::load(settings.ledger_path)?;
        Ok(Self {
            harvester: Harvester::new(deps.renderer, settings.harvest),
            deps,
            ledger,
            vocabulary,
            subscriber_delay: settings.subscriber_delay,
        })
    }

    #[must_use]
    pub fn ledger(&self) -> &SeenLedger {
        &self.ledger
    }

    /// Runs the whole subscriber loop and then releases the rendering
    /// session, whether or not the loop succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ListSubscribers`] if subscribers cannot be
    /// listed. Per-subscriber failures are reported in the summary instead.
    pub async fn run_to_completion(mut self, today: NaiveDate) -> Result<RunSummary, PipelineError> {
        let result = self.run(today).await;
        if let Err(e) = self.deps.renderer.close().await {
            tracing::warn!(error = %e, "failed to release rendering session");
        }
        result
    }

    /// Processes every subscriber in store order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ListSubscribers`] if subscribers cannot be
    /// listed; nothing is processed in that case.
    pub async fn run(&mut self, today: NaiveDate) -> Result<RunSummary, PipelineError> {
        let subscribers = self
            .deps
            .store
            .list_subscribers()
            .await
            .map_err(PipelineError::ListSubscribers)?;
        tracing::info!(subscribers = subscribers.len(), %today, "starting run");

        let mut summary = RunSummary::default();
        for subscriber in &subscribers {
            let report = self.process_subscriber(subscriber, today).await;
            let throttled = report.state() == SubscriberState::Throttled;
            summary.reports.push(report);

            if !throttled && !self.subscriber_delay.is_zero() {
                tokio::time::sleep(self.subscriber_delay).await;
            }
        }

        tracing::info!(
            subscribers = summary.reports.len(),
            throttled = summary.throttled(),
            delivered = summary.delivered(),
            failed_deliveries = summary.failed_deliveries(),
            errored = summary.errored(),
            matched = summary.matched_postings(),
            "run complete"
        );
        Ok(summary)
    }

    /// Takes one subscriber from `Pending` to a terminal state. Never fails:
    /// errors land the subscriber in [`SubscriberState::Errored`].
    pub async fn process_subscriber(
        &mut self,
        subscriber: &Subscriber,
        today: NaiveDate,
    ) -> SubscriberReport {
        let mut report = SubscriberReport::new(&subscriber.email);

        if subscriber.notified_on(today) {
            tracing::info!(email = %subscriber.email, "already notified today; skipping");
            report.advance(SubscriberState::Throttled);
            return report;
        }

        tracing::info!(
            email = %subscriber.email,
            keywords = %subscriber.keywords,
            location = %subscriber.location,
            "processing subscriber"
        );
        match self.discover(subscriber, &mut report).await {
            Ok(matched) => self.deliver(subscriber, &matched, today, &mut report).await,
            Err(e) => {
                tracing::error!(email = %subscriber.email, error = %e, "subscriber errored");
                report.error = Some(e.to_string());
                report.advance(SubscriberState::Errored);
            }
        }
        report
    }

    async fn discover(
        &mut self,
        subscriber: &Subscriber,
        report: &mut SubscriberReport,
    ) -> Result<Vec<MatchedPosting>, SubscriberError> {
        report.advance(SubscriberState::Harvesting);
        let candidates = self
            .harvester
            .harvest(&subscriber.keywords, &subscriber.location)
            .await?;
        report.candidates = candidates.len();

        report.advance(SubscriberState::Matching);
        let mut matched = Vec::new();
        for candidate in candidates {
            if self.ledger.contains(&candidate.url) {
                tracing::debug!(url = %candidate.url, "already seen; skipping");
                report.ledger_hits += 1;
                continue;
            }

            let description = self.deps.details.fetch_description(&candidate.url).await;
            let skills = self.vocabulary.match_description(&description);
            tracing::debug!(url = %candidate.url, matched = skills.len(), "checked posting");

            if let Some(posting) = MatchedPosting::new(candidate, skills) {
                // Recorded before sending: a failed send never re-offers it.
                self.ledger.record(&posting.posting.url)?;
                matched.push(posting);
            }
        }
        report.matched = matched.len();
        Ok(matched)
    }

    async fn deliver(
        &self,
        subscriber: &Subscriber,
        matched: &[MatchedPosting],
        today: NaiveDate,
        report: &mut SubscriberReport,
    ) {
        let Some(digest) = compose_digest(matched) else {
            tracing::info!(email = %subscriber.email, "no new matching postings");
            report.advance(SubscriberState::Done);
            return;
        };

        report.advance(SubscriberState::Notifying);
        if notify(self.deps.mailer, &subscriber.email, &digest).await {
            report.delivery = Delivery::Delivered;
            if let Err(e) = self.deps.store.update_last_sent(&subscriber.email, today).await {
                tracing::warn!(email = %subscriber.email, error = %e, "failed to update last-sent date");
            }
        } else {
            report.delivery = Delivery::Failed;
        }
        report.advance(SubscriberState::Done);
    }
}
