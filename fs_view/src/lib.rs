//! # Filesystem View
//!
//! The naming side of the file system: how paths are split into segments
//! and how a directory maps names to descriptors.
//!
//! ## Design
//!
//! - A directory is a name -> `DescriptorId` map with `.` and `..` entries
//! - Paths are plain segment lists; `.` and `..` are not special-cased here,
//!   they resolve through the entries every directory carries
//! - Resolution against live descriptors happens in the engine, which owns
//!   the descriptor table

pub mod directory;
pub mod path;

pub use directory::{is_dot_entry, DirectoryView, PARENT_ENTRY, SELF_ENTRY};
pub use path::{ParsedPath, PathError, PathParser, SEPARATOR};
