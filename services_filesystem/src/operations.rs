//! Filesystem operations
//!
//! This module defines the operation surface of the engine, its result
//! records, and the error every operation reports.

use core_types::{DescriptorId, FileKind, HandleId};
use fs_view::PathError;
use serde::{Deserialize, Serialize};
use services_storage::StorageError;
use thiserror::Error;

/// Errors that can occur during filesystem operations
///
/// A failed operation leaves the file system exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    /// A required segment or the final path does not resolve
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Creation at a name that is already taken
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Traversal or a directory operation hit something else
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// A file operation hit a directory
    #[error("Is a directory: {0}")]
    IsADirectory(String),

    /// `rmdir` on a directory with entries besides `.` and `..`
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Every descriptor slot is in use
    #[error("No free descriptors (capacity {capacity})")]
    DescriptorsExhausted {
        /// Table capacity
        capacity: usize,
    },

    /// The handle is unknown or already closed
    #[error("Invalid handle: {0}")]
    InvalidHandle(HandleId),

    /// `seek` outside `[0, size]`
    #[error("Offset {offset} out of range (size {size})")]
    OffsetOutOfRange {
        /// Requested offset
        offset: usize,
        /// Current file size
        size: usize,
    },

    /// A path segment exceeds the configured limit
    #[error("Name too long: {name} ({len} bytes, limit {max})")]
    NameTooLong {
        /// The offending segment
        name: String,
        /// Its length in bytes
        len: usize,
        /// The configured limit
        max: usize,
    },

    /// A symlink target does not fit in one block
    #[error("Symlink target too long ({len} bytes, limit {max})")]
    SymlinkTooLong {
        /// Target length in bytes
        len: usize,
        /// Block size
        max: usize,
    },

    /// Too many symlink hops while resolving a path
    #[error("Too many levels of symbolic links: {0}")]
    SymlinkLoop(String),

    /// The path cannot name an entry (empty, or malformed)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The operation does not apply to its target
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Distinguishable failure kinds, without their context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    PathNotFound,
    AlreadyExists,
    NotADirectory,
    IsADirectory,
    DirectoryNotEmpty,
    DescriptorsExhausted,
    InvalidHandle,
    OffsetOutOfRange,
    NameTooLong,
    SymlinkTooLong,
    SymlinkLoop,
    InvalidPath,
    InvalidOperation,
}

impl OperationError {
    /// The kind of failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationError::PathNotFound(_) => ErrorKind::PathNotFound,
            OperationError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            OperationError::NotADirectory(_) => ErrorKind::NotADirectory,
            OperationError::IsADirectory(_) => ErrorKind::IsADirectory,
            OperationError::DirectoryNotEmpty(_) => ErrorKind::DirectoryNotEmpty,
            OperationError::DescriptorsExhausted { .. } => ErrorKind::DescriptorsExhausted,
            OperationError::InvalidHandle(_) => ErrorKind::InvalidHandle,
            OperationError::OffsetOutOfRange { .. } => ErrorKind::OffsetOutOfRange,
            OperationError::NameTooLong { .. } => ErrorKind::NameTooLong,
            OperationError::SymlinkTooLong { .. } => ErrorKind::SymlinkTooLong,
            OperationError::SymlinkLoop(_) => ErrorKind::SymlinkLoop,
            OperationError::InvalidPath(_) => ErrorKind::InvalidPath,
            OperationError::InvalidOperation(_) => ErrorKind::InvalidOperation,
        }
    }
}

impl From<PathError> for OperationError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::InvalidPath(msg) => OperationError::InvalidPath(msg),
            PathError::NameTooLong { name, len, max } => {
                OperationError::NameTooLong { name, len, max }
            }
        }
    }
}

impl From<StorageError> for OperationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DescriptorsExhausted { capacity } => {
                OperationError::DescriptorsExhausted { capacity }
            }
            StorageError::InvalidDescriptor(id) => OperationError::PathNotFound(id.to_string()),
            StorageError::RootPinned => OperationError::InvalidOperation(err.to_string()),
        }
    }
}

/// Metadata about a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatInfo {
    /// Descriptor ID
    pub id: DescriptorId,
    /// Descriptor kind
    pub kind: FileKind,
    /// Size in bytes
    pub size: usize,
    /// Number of names pointing at the descriptor
    pub link_count: usize,
    /// Number of allocated blocks
    pub block_count: usize,
    /// Entry count, `.` and `..` included (directories only)
    pub entry_count: Option<usize>,
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Entry name
    pub name: String,
    /// Descriptor the entry names
    pub id: DescriptorId,
    /// Kind of that descriptor
    pub kind: FileKind,
    /// Its size in bytes
    pub size: usize,
    /// Its link count
    pub link_count: usize,
}

/// Filesystem operations trait
///
/// Every path argument is either absolute (leading `/`) or relative to the
/// engine's current directory.
pub trait FileSystemOperations {
    /// Create an empty regular file
    fn create(&mut self, path: &str) -> Result<DescriptorId, OperationError>;

    /// Create a directory holding only `.` and `..`
    fn mkdir(&mut self, path: &str) -> Result<DescriptorId, OperationError>;

    /// Create a symbolic link at `path` pointing at `target`
    fn symlink(&mut self, target: &str, path: &str) -> Result<DescriptorId, OperationError>;

    /// Add a second name for an existing non-directory
    fn link(&mut self, existing: &str, new_path: &str) -> Result<(), OperationError>;

    /// Remove a name; the descriptor goes once unnamed and unopened
    fn unlink(&mut self, path: &str) -> Result<(), OperationError>;

    /// Open a regular file with the cursor at 0
    fn open(&mut self, path: &str) -> Result<HandleId, OperationError>;

    /// Close a handle
    fn close(&mut self, fd: HandleId) -> Result<(), OperationError>;

    /// Read up to `len` bytes at the cursor
    fn read(&mut self, fd: HandleId, len: usize) -> Result<Vec<u8>, OperationError>;

    /// Write bytes at the cursor, growing the file as needed
    fn write(&mut self, fd: HandleId, data: &[u8]) -> Result<usize, OperationError>;

    /// Move the cursor within `[0, size]`
    fn seek(&mut self, fd: HandleId, offset: usize) -> Result<(), OperationError>;

    /// Set a regular file's size
    fn truncate(&mut self, path: &str, size: usize) -> Result<(), OperationError>;

    /// Describe the descriptor a path resolves to
    fn stat(&mut self, path: &str) -> Result<StatInfo, OperationError>;

    /// Describe the descriptor behind an open handle
    fn fstat(&mut self, fd: HandleId) -> Result<StatInfo, OperationError>;

    /// List a directory
    fn ls(&mut self, path: &str) -> Result<Vec<ListingEntry>, OperationError>;

    /// Remove an empty directory
    fn rmdir(&mut self, path: &str) -> Result<(), OperationError>;

    /// Change the current directory
    fn cd(&mut self, path: &str) -> Result<(), OperationError>;

    /// Read a symlink's target without following it
    fn readlink(&mut self, path: &str) -> Result<String, OperationError>;

    /// Absolute path of the current directory
    fn pwd(&mut self) -> Result<String, OperationError>;
}
