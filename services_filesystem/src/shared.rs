//! Thread-safe access to one engine
//!
//! Every call runs inside one exclusive critical section; there is no
//! finer-grained locking.

use crate::FileSystemEngine;
use std::sync::{Arc, Mutex, PoisonError};

/// A file-system engine shared between threads
#[derive(Debug, Clone, Default)]
pub struct SharedFileSystem {
    inner: Arc<Mutex<FileSystemEngine>>,
}

impl SharedFileSystem {
    /// Wraps an engine for shared use
    pub fn new(engine: FileSystemEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs `f` with exclusive access to the engine
    ///
    /// A panic inside an earlier `f` does not lock others out. Recovery keeps
    /// each individual operation atomic, but a closure that panics between
    /// two operations leaves the first one applied.
    pub fn with<R>(&self, f: impl FnOnce(&mut FileSystemEngine) -> R) -> R {
        let mut engine = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }
}

impl From<FileSystemEngine> for SharedFileSystem {
    fn from(engine: FileSystemEngine) -> Self {
        Self::new(engine)
    }
}
