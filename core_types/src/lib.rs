//! # Core Types
//!
//! This crate defines the fundamental types shared by every layer of the
//! file-system simulator.
//!
//! ## Key Types
//!
//! - [`DescriptorId`]: Slot index of a descriptor (the simulator's inode)
//! - [`HandleId`]: Identifier of an open-file handle
//! - [`FileKind`]: Regular file, directory, or symbolic link

pub mod ids;
pub mod kind;

pub use ids::{DescriptorId, HandleId};
pub use kind::FileKind;
