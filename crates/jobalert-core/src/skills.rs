//! Skill vocabulary and description matching.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Built-in vocabulary, in reporting order.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "sql",
    "power bi",
    "excel",
    "tableau",
    "machine learning",
];

/// An ordered, validated list of skill terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    terms: Vec<String>,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self {
            terms: DEFAULT_SKILLS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl SkillVocabulary {
    /// Builds a vocabulary from raw terms, trimming each one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSkills`] if the list is empty, a term is
    /// blank, or two terms are equal ignoring case.
    pub fn from_terms<I, S>(terms: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                return Err(ConfigError::InvalidSkills("blank skill term".to_string()));
            }
            if !seen.insert(term.to_lowercase()) {
                return Err(ConfigError::InvalidSkills(format!(
                    "duplicate skill term '{term}'"
                )));
            }
            out.push(term.to_string());
        }
        if out.is_empty() {
            return Err(ConfigError::InvalidSkills(
                "vocabulary must contain at least one term".to_string(),
            ));
        }
        Ok(Self { terms: out })
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Matches this vocabulary against a description. See [`match_skills`].
    #[must_use]
    pub fn match_description(&self, description: &str) -> Vec<String> {
        match_skills(description, &self.terms)
    }
}

#[derive(Debug, Deserialize)]
struct SkillsFile {
    skills: Vec<String>,
}

/// Loads the vocabulary from a YAML file of the form `skills: [..]`, or
/// returns the built-in vocabulary when `path` is `None`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_vocabulary(path: Option<&Path>) -> Result<SkillVocabulary, ConfigError> {
    let Some(path) = path else {
        return Ok(SkillVocabulary::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SkillsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: SkillsFile = serde_yaml::from_str(&content)?;
    SkillVocabulary::from_terms(file.skills)
}

/// Returns the vocabulary terms contained in `description`, ignoring case.
///
/// Matching is plain substring containment. Results follow vocabulary order,
/// not the order terms appear in the text. An empty result means the posting
/// is not actionable.
#[must_use]
pub fn match_skills<T: AsRef<str>>(description: &str, vocabulary: &[T]) -> Vec<String> {
    let haystack = description.to_lowercase();
    vocabulary
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|term| !term.is_empty() && haystack.contains(&term.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "skills_test.rs"]
mod tests;
