use thiserror::Error;

/// Failures of the page-rendering capability.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start browser session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("browser command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("page extent is not a number: {0}")]
    UnexpectedExtent(String),

    #[error("renderer unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("posting not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid search base URL \"{base}\": {reason}")]
    InvalidSearchUrl { base: String, reason: String },
}
