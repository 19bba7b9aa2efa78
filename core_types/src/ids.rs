//! Identifiers for file-system entities
//!
//! Both identifiers are slot indices, not random ids: a descriptor id is the
//! index of its slot in the descriptor table and a handle id is the smallest
//! number not held by another open handle. Reuse is safe only because the
//! engine never frees a slot that is still referenced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a descriptor (the engine's inode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DescriptorId(usize);

impl DescriptorId {
    /// The root directory always lives in slot 0
    pub const ROOT: DescriptorId = DescriptorId(0);

    /// Creates a descriptor ID from a slot index
    pub const fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Returns the slot index
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Returns true for the root directory
    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Descriptor({})", self.0)
    }
}

/// Identifier of an open-file handle
///
/// Handles are what callers hold between `open` and `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(usize);

impl HandleId {
    /// Creates a handle ID from a raw number
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw handle number
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Returns the next handle number
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_descriptor() {
        assert!(DescriptorId::ROOT.is_root());
        assert_eq!(DescriptorId::ROOT.index(), 0);
        assert!(!DescriptorId::new(3).is_root());
    }

    #[test]
    fn test_descriptor_id_ordering() {
        assert!(DescriptorId::new(1) < DescriptorId::new(2));
        assert_eq!(DescriptorId::new(7), DescriptorId::new(7));
    }

    #[test]
    fn test_handle_id_next() {
        let fd = HandleId::new(0);
        assert_eq!(fd.next(), HandleId::new(1));
        assert_eq!(fd.next().as_usize(), 1);
    }

    #[test]
    fn test_descriptor_id_display() {
        let display = format!("{}", DescriptorId::new(5));
        assert_eq!(display, "Descriptor(5)");
    }

    #[test]
    fn test_handle_id_display() {
        let display = format!("{}", HandleId::new(2));
        assert!(display.starts_with("Handle("));
    }

    #[test]
    fn test_ids_serialize_transparently_as_numbers() {
        let json = serde_json::to_string(&DescriptorId::new(4)).unwrap();
        assert_eq!(json, "4");
        let back: HandleId = serde_json::from_str("9").unwrap();
        assert_eq!(back, HandleId::new(9));
    }
}
