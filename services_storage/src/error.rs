//! Storage errors

use core_types::DescriptorId;
use thiserror::Error;

/// Errors raised by the descriptor table
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Every slot is occupied
    #[error("No free descriptors (capacity {capacity})")]
    DescriptorsExhausted {
        /// Table capacity
        capacity: usize,
    },

    /// The slot is empty or out of range
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(DescriptorId),

    /// Slot 0 holds the root directory for the table's whole lifetime
    #[error("The root directory cannot be freed")]
    RootPinned,
}
