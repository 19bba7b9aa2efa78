//! Descriptor table
//!
//! A fixed-capacity slot array. Slot 0 holds the root directory from
//! construction onwards and is never freed; every other slot is handed out
//! first-fit. Slot ids are reused after `free`, so callers must only free a
//! slot once nothing refers to it any more.

use crate::{Descriptor, StorageError};
use core_types::DescriptorId;
use fs_view::DirectoryView;

/// Slot array of descriptors
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    slots: Vec<Option<Descriptor>>,
}

impl DescriptorTable {
    /// Creates a table of `capacity` slots with the root directory installed
    ///
    /// The root always gets a slot, so a zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let mut slots = vec![None; capacity.max(1)];
        slots[DescriptorId::ROOT.index()] =
            Some(Descriptor::directory(DirectoryView::root(DescriptorId::ROOT)));
        Self { slots }
    }

    /// Returns the lowest free slot without claiming it
    pub fn next_free(&self) -> Option<DescriptorId> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(DescriptorId::new)
    }

    /// Installs a descriptor built for the lowest free slot
    ///
    /// The builder receives the id the descriptor will live at, so a
    /// directory can point its `.` entry at itself.
    pub fn allocate_with<F>(&mut self, build: F) -> Result<DescriptorId, StorageError>
    where
        F: FnOnce(DescriptorId) -> Descriptor,
    {
        let id = self.next_free().ok_or(StorageError::DescriptorsExhausted {
            capacity: self.slots.len(),
        })?;
        self.slots[id.index()] = Some(build(id));
        Ok(id)
    }

    /// Installs a descriptor in the lowest free slot
    pub fn allocate(&mut self, descriptor: Descriptor) -> Result<DescriptorId, StorageError> {
        self.allocate_with(|_| descriptor)
    }

    /// Empties a slot and returns what it held
    pub fn free(&mut self, id: DescriptorId) -> Result<Descriptor, StorageError> {
        if id.is_root() {
            return Err(StorageError::RootPinned);
        }
        self.slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(StorageError::InvalidDescriptor(id))
    }

    /// Returns the descriptor in a live slot
    pub fn get(&self, id: DescriptorId) -> Option<&Descriptor> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns the descriptor in a live slot, mutably
    pub fn get_mut(&mut self, id: DescriptorId) -> Option<&mut Descriptor> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Number of live descriptors, root included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Always false: the root is always live
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Total number of slots, root included
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterates over live descriptors in slot order
    pub fn iter(&self) -> impl Iterator<Item = (DescriptorId, &Descriptor)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|d| (DescriptorId::new(index), d)))
    }
}
