//! Pluggable persistence backends for the cart.
//!
//! The store reads and writes one opaque string payload under a fixed
//! location, mirroring a browser's `localStorage` slot. Injecting the
//! backend keeps the store testable with an in-memory double.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// A single-slot string store for the serialized cart payload.
pub trait CartStorage: Send + Sync {
    /// Read the persisted payload, or `None` when nothing has been stored.
    ///
    /// Backends must fail soft: an unreadable slot reads as `None`.
    fn load(&self) -> Option<String>;

    /// Replace the persisted payload.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the payload cannot be written. The store
    /// logs and continues; persistence failures are never fatal.
    fn save(&self, payload: &str) -> io::Result<()>;
}

/// File-backed storage at a fixed path, the server-side analogue of a
/// `localStorage` key.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn save(&self, payload: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, payload)
    }
}

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with a raw payload (e.g. malformed JSON for failure
    /// tests).
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
        }
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn save(&self, payload: &str) -> io::Result<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(payload.to_owned());
        Ok(())
    }
}
