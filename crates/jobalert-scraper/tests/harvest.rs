//! Harvester and rendered-detail tests against an in-memory renderer.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use jobalert_scraper::{
    DescriptionSource, GrowthPolicy, HarvestSettings, Harvester, RenderError, Renderer,
    RenderedDetailFetcher, ScraperError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Open(String),
    Wait(Duration),
    Scroll,
    Measure,
    Markup,
    Close,
}

/// Scripted renderer: replays `extents` for each measurement and returns
/// `markup` for the rendered page.
struct FakeRenderer {
    calls: Mutex<Vec<Call>>,
    extents: Mutex<VecDeque<u64>>,
    markup: String,
    fail_open: bool,
}

impl FakeRenderer {
    fn new(extents: &[u64], markup: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            extents: Mutex::new(extents.iter().copied().collect()),
            markup: markup.to_string(),
            fail_open: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(&[], "")
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn open(&self, url: &str) -> Result<(), RenderError> {
        self.record(Call::Open(url.to_string()));
        if self.fail_open {
            return Err(RenderError::Unavailable("navigation timed out".to_string()));
        }
        Ok(())
    }

    async fn wait(&self, duration: Duration) {
        self.record(Call::Wait(duration));
    }

    async fn scroll_to_bottom(&self) -> Result<(), RenderError> {
        self.record(Call::Scroll);
        Ok(())
    }

    async fn measure_page_extent(&self) -> Result<u64, RenderError> {
        self.record(Call::Measure);
        let mut extents = self.extents.lock().unwrap();
        // Once the script runs out the page stops growing.
        let next = if extents.len() > 1 {
            extents.pop_front()
        } else {
            extents.front().copied()
        };
        Ok(next.unwrap_or(0))
    }

    async fn rendered_markup(&self) -> Result<String, RenderError> {
        self.record(Call::Markup);
        Ok(self.markup.clone())
    }

    async fn close(&self) -> Result<(), RenderError> {
        self.record(Call::Close);
        Ok(())
    }
}

fn settings(max_attempts: u32) -> HarvestSettings {
    HarvestSettings {
        search_base_url: "https://jobs.example.com/search/".to_string(),
        settle: Duration::from_secs(5),
        growth: GrowthPolicy::new(Duration::ZERO, max_attempts),
        max_postings: 25,
    }
}

fn results_page(ids: &[u32]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div class="base-card"><a class="base-card__full-link" href="https://jobs.example.com/view/{id}?trk=x">Job {id}</a><h4>Company {id}</h4><span class="job-search-card__location">Remote</span></div>"#
            )
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}

#[tokio::test]
async fn harvest_loads_settles_grows_and_parses() {
    let renderer = FakeRenderer::new(&[1000, 2000, 2000], &results_page(&[1, 2]));
    let harvester = Harvester::new(&renderer, settings(50));

    let postings = harvester.harvest("data analyst", "Remote").await.unwrap();

    assert_eq!(postings.len(), 2);
    assert_eq!(postings[0].url, "https://jobs.example.com/view/1");
    assert_eq!(postings[0].title, "Job 1");
    assert_eq!(postings[0].company, "Company 1");
    assert_eq!(postings[1].url, "https://jobs.example.com/view/2");

    assert_eq!(
        renderer.calls(),
        vec![
            Call::Open(
                "https://jobs.example.com/search/?keywords=data+analyst&location=Remote"
                    .to_string()
            ),
            Call::Wait(Duration::from_secs(5)),
            Call::Measure,
            Call::Scroll,
            Call::Measure,
            Call::Scroll,
            Call::Measure,
            Call::Markup,
        ]
    );
}

#[tokio::test]
async fn harvest_stops_growing_at_max_attempts() {
    let renderer = FakeRenderer::new(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], &results_page(&[1]));
    let harvester = Harvester::new(&renderer, settings(3));

    harvester.harvest("rust", "EU").await.unwrap();

    let scrolls = renderer
        .calls()
        .iter()
        .filter(|c| **c == Call::Scroll)
        .count();
    assert_eq!(scrolls, 3);
}

#[tokio::test]
async fn harvest_caps_postings() {
    let ids: Vec<u32> = (0..40).collect();
    let renderer = FakeRenderer::new(&[500], &results_page(&ids));
    let harvester = Harvester::new(&renderer, settings(5));

    let postings = harvester.harvest("python", "Remote").await.unwrap();
    assert_eq!(postings.len(), 25);
    assert_eq!(postings[24].url, "https://jobs.example.com/view/24");
}

#[tokio::test]
async fn harvest_failure_is_reported_not_panicked() {
    let renderer = FakeRenderer::failing();
    let harvester = Harvester::new(&renderer, settings(5));

    let err = harvester.harvest("python", "Remote").await.unwrap_err();
    assert!(matches!(err, ScraperError::Render(RenderError::Unavailable(_))));
    assert_eq!(renderer.calls().len(), 1, "nothing after the failed open");
}

#[tokio::test]
async fn harvest_rejects_invalid_base_url_without_touching_renderer() {
    let renderer = FakeRenderer::new(&[1], "");
    let mut s = settings(5);
    s.search_base_url = "not a url".to_string();
    let harvester = Harvester::new(&renderer, s);

    let err = harvester.harvest("python", "Remote").await.unwrap_err();
    assert!(matches!(err, ScraperError::InvalidSearchUrl { .. }));
    assert!(renderer.calls().is_empty());
}

#[tokio::test]
async fn rendered_detail_fetch_normalizes_page() {
    let renderer = FakeRenderer::new(
        &[1],
        "<html><body><h1>Analyst</h1><p>Needs  SQL and\nPower BI</p></body></html>",
    );
    let fetcher = RenderedDetailFetcher::new(&renderer, Duration::from_secs(2));

    let description = fetcher
        .fetch_description("https://jobs.example.com/view/1")
        .await;

    assert_eq!(description, "analyst needs sql and power bi");
    assert_eq!(
        renderer.calls(),
        vec![
            Call::Open("https://jobs.example.com/view/1".to_string()),
            Call::Wait(Duration::from_secs(2)),
            Call::Markup,
        ]
    );
}

#[tokio::test]
async fn rendered_detail_fetch_degrades_to_empty_on_error() {
    let renderer = FakeRenderer::failing();
    let fetcher = RenderedDetailFetcher::new(&renderer, Duration::ZERO);

    let description = fetcher
        .fetch_description("https://jobs.example.com/view/1")
        .await;
    assert_eq!(description, "");
}
