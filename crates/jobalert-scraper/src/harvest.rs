//! Listing harvester: search page → candidate postings.

use std::time::Duration;

use jobalert_core::CandidatePosting;

use crate::error::ScraperError;
use crate::growth::{poll_until_stable, GrowthPolicy};
use crate::parse::parse_cards;
use crate::render::Renderer;
use crate::search::build_search_url;

/// Cards considered per subscriber per run.
pub const DEFAULT_MAX_POSTINGS: usize = 25;

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub search_base_url: String,
    /// Pause after the search page loads, before growth polling starts.
    pub settle: Duration,
    pub growth: GrowthPolicy,
    pub max_postings: usize,
}

impl HarvestSettings {
    #[must_use]
    pub fn from_app_config(config: &jobalert_core::AppConfig) -> Self {
        Self {
            search_base_url: config.search_base_url.clone(),
            settle: Duration::from_secs(config.page_settle_secs),
            growth: GrowthPolicy::new(
                Duration::from_secs(config.scroll_pause_secs),
                config.scroll_max_attempts,
            ),
            max_postings: config.max_postings,
        }
    }
}

/// Drives a [`Renderer`] through one search and extracts its result cards.
pub struct Harvester<'a> {
    renderer: &'a dyn Renderer,
    settings: HarvestSettings,
}

impl<'a> Harvester<'a> {
    #[must_use]
    pub fn new(renderer: &'a dyn Renderer, settings: HarvestSettings) -> Self {
        Self { renderer, settings }
    }

    /// Searches for `keywords` in `location` and returns up to
    /// `max_postings` candidates in page order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSearchUrl`] for a bad base URL and
    /// [`ScraperError::Render`] if loading, scrolling, measuring, or reading
    /// the page fails. Callers treat either as a failure of this one search.
    pub async fn harvest(
        &self,
        keywords: &str,
        location: &str,
    ) -> Result<Vec<CandidatePosting>, ScraperError> {
        let url = build_search_url(&self.settings.search_base_url, keywords, location)?;
        let renderer = self.renderer;

        renderer.open(url.as_str()).await?;
        renderer.wait(self.settings.settle).await;

        let growth = poll_until_stable(
            &self.settings.growth,
            || renderer.scroll_to_bottom(),
            || renderer.measure_page_extent(),
        )
        .await?;
        tracing::debug!(
            url = %url,
            attempts = growth.attempts,
            extent = growth.extent,
            settled = growth.settled,
            "search page finished growing"
        );

        let markup = renderer.rendered_markup().await?;
        let postings = parse_cards(&markup, self.settings.max_postings);
        tracing::info!(keywords, location, found = postings.len(), "harvested postings");
        Ok(postings)
    }
}
