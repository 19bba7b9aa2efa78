//! Descriptor kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a descriptor
///
/// Fixed when the descriptor is created and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// Regular file backed by fixed-size blocks
    Regular,
    /// Directory holding a name -> descriptor mapping
    Directory,
    /// Symbolic link holding a target path
    Symlink,
}

impl FileKind {
    /// Short upper-case label used in listings
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Regular => "REGULAR",
            FileKind::Directory => "DIRECTORY",
            FileKind::Symlink => "SYMLINK",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
