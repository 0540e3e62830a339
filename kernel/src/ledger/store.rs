// Ledger Storage
//
// Durability boundary for the ledger document: one whole-document read
// at startup, one whole-document write after every mutation. There are
// no partial updates, no transactions, and no versioning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Ledger;

/// Raised when the persistence layer could not read or write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] io::Error),

    #[error("ledger not serializable: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How a load resolved.
#[derive(Debug)]
pub enum LoadOutcome {
    /// A document existed and parsed.
    Loaded(Ledger),

    /// No document yet; the fallback was taken as the initial state.
    Fresh(Ledger),

    /// A document existed but was not a readable ledger. The fallback
    /// was substituted (fail closed) and the cause is kept for the
    /// caller to surface.
    Defaulted { ledger: Ledger, reason: String },
}

impl LoadOutcome {
    /// The resulting document, however it was obtained.
    pub fn into_ledger(self) -> Ledger {
        match self {
            Self::Loaded(ledger) | Self::Fresh(ledger) => ledger,
            Self::Defaulted { ledger, .. } => ledger,
        }
    }
}

/// Storage backend for the ledger document.
///
/// Implementations must treat the document as a single value:
/// - Reads return the whole document.
/// - Writes replace the whole document (last write wins).
pub trait LedgerStore {
    /// Load the document, taking `fallback` when none exists or the
    /// stored bytes are not a ledger.
    fn load(&self, fallback: Ledger) -> Result<LoadOutcome, StoreError>;

    /// Persist the whole document.
    fn save(&mut self, ledger: &Ledger) -> Result<(), StoreError>;
}

/// One pretty-printed JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self, fallback: Ledger) -> Result<LoadOutcome, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(LoadOutcome::Fresh(fallback));
            }
            Err(err) => return Err(StoreError::Unavailable(err)),
        };

        match serde_json::from_str(&raw) {
            Ok(ledger) => Ok(LoadOutcome::Loaded(ledger)),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "stored document is not a ledger; failing closed to the fallback"
                );
                Ok(LoadOutcome::Defaulted {
                    ledger: fallback,
                    reason: err.to_string(),
                })
            }
        }
    }

    fn save(&mut self, ledger: &Ledger) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(ledger)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    doc: Option<Ledger>,
}

impl LedgerStore for InMemoryStore {
    fn load(&self, fallback: Ledger) -> Result<LoadOutcome, StoreError> {
        match &self.doc {
            Some(ledger) => Ok(LoadOutcome::Loaded(ledger.clone())),
            None => Ok(LoadOutcome::Fresh(fallback)),
        }
    }

    fn save(&mut self, ledger: &Ledger) -> Result<(), StoreError> {
        self.doc = Some(ledger.clone());
        Ok(())
    }
}
