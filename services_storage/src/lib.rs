//! # Storage Service
//!
//! This crate defines the storage model behind every name in the file
//! system.
//!
//! ## Design
//!
//! - **BlockStore**: a regular file's bytes as fixed-size blocks, sized to
//!   exactly `ceil(size / block_size)` blocks
//! - **Descriptor**: kind, size, link count, and a tagged payload (blocks,
//!   directory entries, or symlink target)
//! - **DescriptorTable**: fixed-capacity first-fit slot array with the root
//!   directory pinned in slot 0
//!
//! Nothing here decides when a descriptor dies; that is the engine's
//! reclamation rule, applied on top of `DescriptorTable::free`.

pub mod block_store;
pub mod descriptor;
pub mod descriptor_table;
pub mod error;

pub use block_store::BlockStore;
pub use descriptor::{Descriptor, DescriptorPayload};
pub use descriptor_table::DescriptorTable;
pub use error::StorageError;
