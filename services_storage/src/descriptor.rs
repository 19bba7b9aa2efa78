//! Descriptors
//!
//! A descriptor is the simulator's inode: a kind, a size, a link count, and
//! a payload whose shape depends on the kind.

use crate::BlockStore;
use core_types::FileKind;
use fs_view::DirectoryView;

/// Kind-specific content of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorPayload {
    /// File bytes
    Regular(BlockStore),
    /// Name -> descriptor entries
    Directory(DirectoryView),
    /// Target path, fixed at creation
    Symlink(String),
}

/// A live descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    link_count: usize,
    payload: DescriptorPayload,
}

impl Descriptor {
    /// Creates an empty regular file with one link
    pub fn regular(block_size: usize) -> Self {
        Self::with_payload(DescriptorPayload::Regular(BlockStore::new(block_size)))
    }

    /// Creates a directory with one link
    pub fn directory(entries: DirectoryView) -> Self {
        Self::with_payload(DescriptorPayload::Directory(entries))
    }

    /// Creates a symlink with one link
    pub fn symlink(target: impl Into<String>) -> Self {
        Self::with_payload(DescriptorPayload::Symlink(target.into()))
    }

    fn with_payload(payload: DescriptorPayload) -> Self {
        Self {
            link_count: 1,
            payload,
        }
    }

    /// Kind of this descriptor
    pub fn kind(&self) -> FileKind {
        match self.payload {
            DescriptorPayload::Regular(_) => FileKind::Regular,
            DescriptorPayload::Directory(_) => FileKind::Directory,
            DescriptorPayload::Symlink(_) => FileKind::Symlink,
        }
    }

    /// Size in bytes: data length for files, target length for symlinks,
    /// zero for directories
    pub fn size(&self) -> usize {
        match &self.payload {
            DescriptorPayload::Regular(store) => store.size(),
            DescriptorPayload::Directory(_) => 0,
            DescriptorPayload::Symlink(target) => target.len(),
        }
    }

    /// Number of allocated blocks (non-zero only for regular files)
    pub fn block_count(&self) -> usize {
        match &self.payload {
            DescriptorPayload::Regular(store) => store.block_count(),
            _ => 0,
        }
    }

    /// Number of directory entries naming this descriptor
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// Records one more name
    pub fn increment_links(&mut self) {
        self.link_count += 1;
    }

    /// Records one name fewer and returns the new count
    pub fn decrement_links(&mut self) -> usize {
        self.link_count = self.link_count.saturating_sub(1);
        self.link_count
    }

    /// Returns true for directories
    pub fn is_directory(&self) -> bool {
        matches!(self.payload, DescriptorPayload::Directory(_))
    }

    /// Returns true for symbolic links
    pub fn is_symlink(&self) -> bool {
        matches!(self.payload, DescriptorPayload::Symlink(_))
    }

    /// Kind-specific content
    pub fn payload(&self) -> &DescriptorPayload {
        &self.payload
    }

    /// Block storage, if this is a regular file
    pub fn blocks(&self) -> Option<&BlockStore> {
        match &self.payload {
            DescriptorPayload::Regular(store) => Some(store),
            _ => None,
        }
    }

    /// Block storage, mutably, if this is a regular file
    pub fn blocks_mut(&mut self) -> Option<&mut BlockStore> {
        match &mut self.payload {
            DescriptorPayload::Regular(store) => Some(store),
            _ => None,
        }
    }

    /// Directory entries, if this is a directory
    pub fn entries(&self) -> Option<&DirectoryView> {
        match &self.payload {
            DescriptorPayload::Directory(entries) => Some(entries),
            _ => None,
        }
    }

    /// Directory entries, mutably, if this is a directory
    pub fn entries_mut(&mut self) -> Option<&mut DirectoryView> {
        match &mut self.payload {
            DescriptorPayload::Directory(entries) => Some(entries),
            _ => None,
        }
    }

    /// Link target, if this is a symlink
    pub fn symlink_target(&self) -> Option<&str> {
        match &self.payload {
            DescriptorPayload::Symlink(target) => Some(target.as_str()),
            _ => None,
        }
    }
}
