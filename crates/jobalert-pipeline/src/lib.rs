//! The per-subscriber discovery and notification pipeline.
//!
//! [`Orchestrator`] walks every subscriber through harvesting, matching, and
//! notification, deduplicating postings across subscribers and runs through a
//! [`SeenLedger`].

pub mod error;
pub mod ledger;
pub mod orchestrator;
pub mod state;
pub mod store;

pub use error::{LedgerError, PipelineError, StoreError, SubscriberError};
pub use ledger::SeenLedger;
pub use orchestrator::{Collaborators, Orchestrator, PipelineSettings};
pub use state::{Delivery, RunSummary, SubscriberReport, SubscriberState};
pub use store::{PgSubscriberStore, SubscriberStore};
