//! Per-subscriber processing states and run reporting.

use std::fmt;

/// Where a subscriber is in one run.
///
/// ```text
/// Pending ──► Throttled
///    │
///    ▼
/// Harvesting ──► Matching ──► Notifying ──► Done
///    │              │  └──────────────────►─┘ (no matches)
///    └──────────────┴──► Errored
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    Pending,
    Throttled,
    Harvesting,
    Matching,
    Notifying,
    Done,
    Errored,
}

impl SubscriberState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Throttled | Self::Done | Self::Errored)
    }

    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use SubscriberState::{Done, Errored, Harvesting, Matching, Notifying, Pending, Throttled};
        match (self, next) {
            (Pending, Throttled | Harvesting)
            | (Harvesting, Matching)
            | (Matching, Notifying | Done)
            | (Notifying, Done) => true,
            (from, Errored) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SubscriberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Throttled => "throttled",
            Self::Harvesting => "harvesting",
            Self::Matching => "matching",
            Self::Notifying => "notifying",
            Self::Done => "done",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// What happened to the digest for one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No send was attempted: throttled, errored, or nothing matched.
    NotAttempted,
    Delivered,
    Failed,
}

/// Outcome of one subscriber's pass through the pipeline.
#[derive(Debug, Clone)]
pub struct SubscriberReport {
    pub email: String,
    /// Every state visited, starting with [`SubscriberState::Pending`].
    pub trail: Vec<SubscriberState>,
    pub candidates: usize,
    pub ledger_hits: usize,
    pub matched: usize,
    pub delivery: Delivery,
    pub error: Option<String>,
}

impl SubscriberReport {
    pub(crate) fn new(email: &str) -> Self {
        Self {
            email: email.to_owned(),
            trail: vec![SubscriberState::Pending],
            candidates: 0,
            ledger_hits: 0,
            matched: 0,
            delivery: Delivery::NotAttempted,
            error: None,
        }
    }

    /// Current (last visited) state.
    #[must_use]
    pub fn state(&self) -> SubscriberState {
        self.trail
            .last()
            .copied()
            .unwrap_or(SubscriberState::Pending)
    }

    pub(crate) fn advance(&mut self, next: SubscriberState) {
        debug_assert!(
            self.state().can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state()
        );
        self.trail.push(next);
    }

    #[must_use]
    pub fn visited(&self, state: SubscriberState) -> bool {
        self.trail.contains(&state)
    }
}

/// Per-subscriber reports for a whole run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<SubscriberReport>,
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&SubscriberReport) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(r)).count()
    }

    #[must_use]
    pub fn throttled(&self) -> usize {
        self.count(|r| r.state() == SubscriberState::Throttled)
    }

    #[must_use]
    pub fn errored(&self) -> usize {
        self.count(|r| r.state() == SubscriberState::Errored)
    }

    #[must_use]
    pub fn delivered(&self) -> usize {
        self.count(|r| r.delivery == Delivery::Delivered)
    }

    #[must_use]
    pub fn failed_deliveries(&self) -> usize {
        self.count(|r| r.delivery == Delivery::Failed)
    }

    #[must_use]
    pub fn matched_postings(&self) -> usize {
        self.reports.iter().map(|r| r.matched).sum()
    }
}
