//! Configuration for bulletin imports.

use crate::error::IsfError;

/// What to do with lines that cannot start anything while the parser waits
/// for a catalogue or event header.
///
/// Bulletins commonly carry free-text preambles and page footers between
/// events; those lines land here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JunkPolicy {
    /// Ignore the line (logged at debug level).
    #[default]
    Skip,
    /// Record an [`IsfError::UnexpectedLine`] in the report and continue.
    Record,
    /// Roll back the pending batch and abort the import.
    Fatal,
}

/// Configuration for [`import_events`](crate::import_events).
///
/// # Example
///
/// ```
/// use emsr_isf::{ImportConfig, JunkPolicy};
///
/// let config = ImportConfig::new("EMSC")
///     .with_commit_every(500)
///     .with_junk_policy(JunkPolicy::Record);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Catalogue name attached to every imported event.
    catalogue: String,
    /// Number of lines between store commits.
    commit_every: usize,
    junk_policy: JunkPolicy,
}

impl ImportConfig {
    /// Creates a configuration for the named catalogue.
    ///
    /// Defaults: `commit_every = 1000`, `junk_policy = Skip`.
    pub fn new(catalogue: impl Into<String>) -> Self {
        Self {
            catalogue: catalogue.into(),
            commit_every: 1000,
            junk_policy: JunkPolicy::Skip,
        }
    }

    /// Sets the number of lines between commits.
    pub fn with_commit_every(mut self, commit_every: usize) -> Self {
        self.commit_every = commit_every;
        self
    }

    /// Sets the handling of unparseable lines outside events.
    pub fn with_junk_policy(mut self, junk_policy: JunkPolicy) -> Self {
        self.junk_policy = junk_policy;
        self
    }

    /// Returns the catalogue name.
    pub fn catalogue(&self) -> &str {
        &self.catalogue
    }

    /// Returns the commit interval in lines.
    pub fn commit_every(&self) -> usize {
        self.commit_every
    }

    /// Returns the junk line policy.
    pub fn junk_policy(&self) -> JunkPolicy {
        self.junk_policy
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `commit_every` is zero.
    pub fn validate(&self) -> Result<(), IsfError> {
        if self.commit_every < 1 {
            return Err(IsfError::InvalidCommitEvery {
                value: self.commit_every,
            });
        }
        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new("ISC")
    }
}
