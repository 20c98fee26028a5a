//! Durable record of posting URLs already surfaced to any subscriber.
//!
//! The ledger is a write-through set over an append-only text file with one
//! identifier per line. The file is read in full once at load and opened in
//! append mode for each new record, so it is never held open across a run.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::LedgerError;

#[derive(Debug)]
pub struct SeenLedger {
    path: PathBuf,
    seen: HashSet<String>,
    // Set when the file's last line was cut short (e.g. a crash mid-append);
    // the next append must start on a fresh line.
    needs_newline: bool,
}

impl SeenLedger {
    /// Loads the ledger from `path`. A missing file yields an empty ledger.
    ///
    /// Blank lines are ignored and repeated lines collapse into one entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the file exists but cannot be read.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(io_error(&path, e)),
        };

        let seen: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        let needs_newline = !content.is_empty() && !content.ends_with('\n');

        tracing::info!(path = %path.display(), entries = seen.len(), "loaded seen-posting ledger");
        Ok(Self {
            path,
            seen,
            needs_newline,
        })
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id.trim())
    }

    /// Records `id`, appending it to the file before adding it in memory.
    ///
    /// Returns `Ok(true)` if the id was new, `Ok(false)` if it was already
    /// recorded (or blank), in which case nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the append fails; the id is then not
    /// added in memory either.
    pub fn record(&mut self, id: &str) -> Result<bool, LedgerError> {
        let id = id.trim();
        if id.is_empty() || self.seen.contains(id) {
            return Ok(false);
        }

        self.append_line(id)?;
        self.needs_newline = false;
        self.seen.insert(id.to_owned());
        Ok(true)
    }

    fn append_line(&self, id: &str) -> Result<(), LedgerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_error(&self.path, e))?;

        let line = if self.needs_newline {
            format!("\n{id}\n")
        } else {
            format!("{id}\n")
        };
        file.write_all(line.as_bytes())
            .and_then(|()| file.sync_data())
            .map_err(|e| io_error(&self.path, e))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LedgerError {
    LedgerError::Io {
        path: path.display().to_string(),
        source,
    }
}
