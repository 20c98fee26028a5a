//! Job board scraping: search URL construction, page growth polling, card
//! extraction, and posting description retrieval.
//!
//! Page access goes through the [`Renderer`] trait so the harvesting logic can
//! run against a real WebDriver session or an in-memory fake.

pub mod detail;
pub mod error;
pub mod growth;
pub mod harvest;
pub mod normalize;
pub mod parse;
pub mod render;
pub mod search;
pub mod webdriver;

mod rate_limit;

pub use detail::{DescriptionSource, HttpDetailFetcher, RenderedDetailFetcher};
pub use error::{RenderError, ScraperError};
pub use growth::{poll_until_stable, GrowthOutcome, GrowthPolicy};
pub use harvest::{HarvestSettings, Harvester, DEFAULT_MAX_POSTINGS};
pub use normalize::normalize_description;
pub use parse::parse_cards;
pub use render::Renderer;
pub use search::{build_search_url, canonical_posting_url};
pub use webdriver::WebDriverRenderer;
