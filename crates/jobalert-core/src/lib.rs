//! Shared domain types, skill matching, and configuration for jobalert.

pub mod app_config;
pub mod config;
pub mod intake;
pub mod postings;
pub mod skills;

use thiserror::Error;

pub use app_config::{AppConfig, DetailSourceKind, Environment, SmtpCredentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use intake::NewSubscriber;
pub use postings::{CandidatePosting, MatchedPosting, Subscriber};
pub use skills::{load_vocabulary, match_skills, SkillVocabulary, DEFAULT_SKILLS};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("field '{0}' must not be blank")]
    BlankField(&'static str),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read skills file {path}: {source}")]
    SkillsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse skills file: {0}")]
    SkillsFileParse(#[from] serde_yaml::Error),

    #[error("invalid skills vocabulary: {0}")]
    InvalidSkills(String),
}
