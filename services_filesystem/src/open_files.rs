//! Open-file table
//!
//! Maps handle ids to `(descriptor, cursor)` pairs. Handles are what keep an
//! unlinked descriptor alive, so the table also answers "is anyone still
//! holding this descriptor open?".

use core_types::{DescriptorId, HandleId};
use std::collections::BTreeMap;

/// One open handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    /// Descriptor the handle reads and writes
    pub descriptor: DescriptorId,
    /// Byte offset of the next read or write
    pub cursor: usize,
}

/// All open handles of one file-system instance
#[derive(Debug, Clone, Default)]
pub struct OpenFileTable {
    handles: BTreeMap<HandleId, OpenFile>,
}

impl OpenFileTable {
    /// Creates a table with no open handles
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a handle on `descriptor` with the cursor at 0
    ///
    /// The lowest handle number not currently in use is returned.
    pub fn open(&mut self, descriptor: DescriptorId) -> HandleId {
        let mut fd = HandleId::new(0);
        while self.handles.contains_key(&fd) {
            fd = fd.next();
        }
        self.handles.insert(
            fd,
            OpenFile {
                descriptor,
                cursor: 0,
            },
        );
        fd
    }

    /// Removes a handle and returns what it pointed at
    pub fn close(&mut self, fd: HandleId) -> Option<OpenFile> {
        self.handles.remove(&fd)
    }

    /// Looks up an open handle
    pub fn get(&self, fd: HandleId) -> Option<&OpenFile> {
        self.handles.get(&fd)
    }

    /// Looks up an open handle, mutably
    pub fn get_mut(&mut self, fd: HandleId) -> Option<&mut OpenFile> {
        self.handles.get_mut(&fd)
    }

    /// Returns true if any handle points at `descriptor`
    pub fn references(&self, descriptor: DescriptorId) -> bool {
        self.handles.values().any(|f| f.descriptor == descriptor)
    }

    /// Pulls every cursor on `descriptor` back to at most `size`
    pub fn clamp_cursors(&mut self, descriptor: DescriptorId, size: usize) {
        for file in self.handles.values_mut() {
            if file.descriptor == descriptor && file.cursor > size {
                file.cursor = size;
            }
        }
    }

    /// Number of open handles
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if no handle is open
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
