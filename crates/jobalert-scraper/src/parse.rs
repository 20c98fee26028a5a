//! Extraction of candidate postings from a rendered search results page.

use std::sync::LazyLock;

use jobalert_core::CandidatePosting;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::collapse_whitespace;
use crate::search::canonical_posting_url;

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.base-card").expect("card selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.base-card__full-link").expect("link selector"));
static COMPANY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h4").expect("company selector"));
static LOCATION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.job-search-card__location").expect("location selector")
});

/// Parses up to `max_cards` result cards, in page order, into candidates.
///
/// The cap applies to cards, not to extracted postings: a card without a
/// usable link still counts toward `max_cards` and is skipped. Company and
/// location fall back to empty strings when absent.
#[must_use]
pub fn parse_cards(markup: &str, max_cards: usize) -> Vec<CandidatePosting> {
    let document = Html::parse_document(markup);

    document
        .select(&CARD)
        .take(max_cards)
        .filter_map(parse_card)
        .collect()
}

fn parse_card(card: ElementRef<'_>) -> Option<CandidatePosting> {
    let Some(link) = card.select(&LINK).next() else {
        tracing::debug!("skipping card without a posting link");
        return None;
    };
    let Some(url) = link.value().attr("href").and_then(canonical_posting_url) else {
        tracing::debug!("skipping card with an empty posting link");
        return None;
    };

    Some(CandidatePosting {
        url,
        title: element_text(link),
        company: card.select(&COMPANY).next().map(element_text).unwrap_or_default(),
        location: card
            .select(&LOCATION)
            .next()
            .map(element_text)
            .unwrap_or_default(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
