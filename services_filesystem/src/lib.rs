//! # Filesystem Service
//!
//! An in-memory hierarchical file system: directories, regular files backed
//! by fixed-size blocks, hard links and symbolic links, with a table of open
//! handles and a current directory.
//!
//! ## Philosophy
//!
//! - One engine instance owns all state; there are no globals
//! - A failed operation changes nothing
//! - A descriptor lives while it has a name or an open handle
//! - Every operation is recorded in the engine's event log; nothing is printed
//!
//! ## Operations
//!
//! - `create(path)`, `mkdir(path)`, `symlink(target, path)`: Make new entries
//! - `link(existing, new)`, `unlink(path)`: Add and remove names
//! - `open`, `close`, `read`, `write`, `seek`: Handle-based I/O
//! - `truncate(path, size)`: Grow or shrink a regular file
//! - `stat`, `fstat`, `ls`, `readlink`: Inspect
//! - `rmdir(path)`, `cd(path)`, `pwd()`: Directory management

pub mod open_files;
pub mod operations;
pub mod resolver;
pub mod service;
pub mod shared;

pub use open_files::{OpenFile, OpenFileTable};
pub use operations::{ErrorKind, FileSystemOperations, ListingEntry, OperationError, StatInfo};
pub use resolver::{Location, PathResolver};
pub use service::FileSystemEngine;
pub use shared::SharedFileSystem;
