use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] jobalert_db::DbError),

    #[error("subscriber store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that end the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to list subscribers: {0}")]
    ListSubscribers(#[source] StoreError),

    #[error("failed to open seen-posting ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Errors that end processing for one subscriber; the run continues.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("harvest failed: {0}")]
    Harvest(#[from] jobalert_scraper::ScraperError),

    #[error("ledger write failed: {0}")]
    Ledger(#[from] LedgerError),
}
