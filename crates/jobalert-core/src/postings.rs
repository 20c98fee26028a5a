//! Subscriber and posting types shared across the pipeline crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered subscriber as read from the subscriber store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub keywords: String,
    pub location: String,
    pub last_email_sent: Option<NaiveDate>,
}

impl Subscriber {
    /// Returns `true` when this subscriber was already notified on `today`.
    #[must_use]
    pub fn notified_on(&self, today: NaiveDate) -> bool {
        self.last_email_sent == Some(today)
    }
}

/// A job listing extracted from a search results page, before matching.
///
/// `url` is the canonical identifier: the posting link with its query string
/// stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePosting {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,
}

/// A candidate whose description matched at least one vocabulary term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPosting {
    pub posting: CandidatePosting,
    pub skills: Vec<String>,
}

impl MatchedPosting {
    /// Pairs a candidate with its matched skills.
    ///
    /// Returns `None` when `skills` is empty: a posting with no matches is not
    /// actionable.
    #[must_use]
    pub fn new(posting: CandidatePosting, skills: Vec<String>) -> Option<Self> {
        if skills.is_empty() {
            None
        } else {
            Some(Self { posting, skills })
        }
    }
}
