//! Search URL construction and posting URL canonicalization.

use reqwest::Url;

use crate::error::ScraperError;

/// Builds the search URL for a keyword/location pair.
///
/// Both values are form-encoded into the `keywords` and `location` query
/// parameters (spaces become `+`). Any query already present on `base` is kept.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSearchUrl`] if `base` is not an absolute URL.
pub fn build_search_url(base: &str, keywords: &str, location: &str) -> Result<Url, ScraperError> {
    let mut url = Url::parse(base).map_err(|e| ScraperError::InvalidSearchUrl {
        base: base.to_owned(),
        reason: e.to_string(),
    })?;

    url.query_pairs_mut()
        .append_pair("keywords", keywords)
        .append_pair("location", location);

    Ok(url)
}

/// Strips the query string from a posting link, yielding its identifier.
///
/// Returns `None` for links that are empty once trimmed.
#[must_use]
pub fn canonical_posting_url(href: &str) -> Option<String> {
    let trimmed = href.trim();
    let without_query = trimmed.split('?').next().unwrap_or(trimmed).trim();
    if without_query.is_empty() {
        None
    } else {
        Some(without_query.to_owned())
    }
}
