//! Directory contents
//!
//! A directory is a mapping from entry names to descriptor ids. Every
//! directory carries `.` (itself) and `..` (its parent); the root's `..`
//! points back at the root.

use core_types::DescriptorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the self entry
pub const SELF_ENTRY: &str = ".";
/// Name of the parent entry
pub const PARENT_ENTRY: &str = "..";

/// Entries of one directory
///
/// Names are unique; iteration is in name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryView {
    entries: BTreeMap<String, DescriptorId>,
}

impl DirectoryView {
    /// Creates a directory holding only `.` and `..`
    pub fn new(self_id: DescriptorId, parent_id: DescriptorId) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(SELF_ENTRY.to_string(), self_id);
        entries.insert(PARENT_ENTRY.to_string(), parent_id);
        Self { entries }
    }

    /// Creates a root directory whose `..` points at itself
    pub fn root(root_id: DescriptorId) -> Self {
        Self::new(root_id, root_id)
    }

    /// Adds an entry to the directory
    ///
    /// Returns true if the entry was added, false if the name is taken.
    pub fn add_entry(&mut self, name: impl Into<String>, id: DescriptorId) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, id);
        true
    }

    /// Removes an entry from the directory
    ///
    /// Returns the id it named, if it existed.
    pub fn remove_entry(&mut self, name: &str) -> Option<DescriptorId> {
        self.entries.remove(name)
    }

    /// Gets the id an entry names
    pub fn get_entry(&self, name: &str) -> Option<DescriptorId> {
        self.entries.get(name).copied()
    }

    /// Returns true if the name is taken
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Lists all entries, `.` and `..` included, in name order
    pub fn list_entries(&self) -> impl Iterator<Item = (&str, DescriptorId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Finds the ordinary (non-dot) name under which `id` is listed here
    pub fn name_of(&self, id: DescriptorId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, entry)| **entry == id && !is_dot_entry(name))
            .map(|(name, _)| name.as_str())
    }

    /// The id of this directory's parent
    pub fn parent(&self) -> Option<DescriptorId> {
        self.get_entry(PARENT_ENTRY)
    }

    /// Counts the entries, `.` and `..` included
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing but `.` and `..` is present
    pub fn is_empty(&self) -> bool {
        self.entries.keys().all(|name| is_dot_entry(name))
    }
}

/// Returns true for `.` and `..`
pub fn is_dot_entry(name: &str) -> bool {
    name == SELF_ENTRY || name == PARENT_ENTRY
}
