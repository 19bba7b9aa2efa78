//! Filesystem Test Utilities
//!
//! Shared helpers for the integration tests in `tests/`.
//!
//! ## Test Philosophy
//!
//! - **Whole-engine checks**: Tests drive the public operation surface only
//! - **Unchanged on failure**: A rejected operation leaves no trace besides its log entry
//! - **Accounting**: Block counts always match file sizes

use services_filesystem::{FileSystemEngine, FileSystemOperations, ListingEntry};
use services_settings::FsConfig;
use services_storage::BlockStore;

/// Engine with default settings
pub fn default_engine() -> FileSystemEngine {
    FileSystemEngine::default()
}

/// Engine with tiny blocks and a tiny descriptor table
///
/// Small limits make block boundaries and exhaustion easy to hit.
pub fn small_engine(block_size: usize, max_descriptors: usize) -> FileSystemEngine {
    let config = FsConfig::default()
        .with_block_size(block_size)
        .with_max_descriptors(max_descriptors);
    FileSystemEngine::new(config).expect("valid test config")
}

/// Creates a file at `path` holding `data`
pub fn write_file(fs: &mut FileSystemEngine, path: &str, data: &[u8]) {
    fs.create(path).expect("create file");
    let fd = fs.open(path).expect("open file");
    fs.write(fd, data).expect("write file");
    fs.close(fd).expect("close file");
}

/// Reads the whole file at `path`
pub fn read_file(fs: &mut FileSystemEngine, path: &str) -> Vec<u8> {
    let size = fs.stat(path).expect("stat file").size;
    let fd = fs.open(path).expect("open file");
    let data = fs.read(fd, size).expect("read file");
    fs.close(fd).expect("close file");
    data
}

/// Entry names of a listing, in listing order
pub fn names(listing: &[ListingEntry]) -> Vec<&str> {
    listing.iter().map(|e| e.name.as_str()).collect()
}

/// Checks that every live regular file holds exactly the blocks its size needs
pub fn assert_block_accounting(fs: &FileSystemEngine) {
    for (id, desc) in fs.descriptors().iter() {
        if let Some(blocks) = desc.blocks() {
            assert_eq!(blocks.block_size(), fs.config().block_size);
            assert_eq!(
                blocks.block_count(),
                BlockStore::blocks_for(blocks.size(), blocks.block_size()),
                "block count of {} does not match size {}",
                id,
                blocks.size()
            );
        }
    }
}

/// Everything observable about the tree reachable from `/`, for before/after comparisons
pub fn snapshot(fs: &mut FileSystemEngine) -> Vec<(String, ListingEntry)> {
    let mut out = Vec::new();
    let mut pending = vec!["/".to_string()];
    while let Some(dir) = pending.pop() {
        let listing = fs.ls(&dir).expect("list directory");
        for entry in listing {
            if entry.name == "." || entry.name == ".." {
                continue;
            }
            let path = if dir == "/" {
                format!("/{}", entry.name)
            } else {
                format!("{}/{}", dir, entry.name)
            };
            if entry.kind == core_types::FileKind::Directory {
                pending.push(path.clone());
            }
            out.push((path, entry));
        }
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_helpers() {
        let mut fs = small_engine(4, 8);
        write_file(&mut fs, "f", b"hello");
        assert_eq!(read_file(&mut fs, "f"), b"hello");
        assert_block_accounting(&fs);
    }

    #[test]
    fn test_snapshot_walks_subdirectories() {
        let mut fs = default_engine();
        fs.mkdir("a").unwrap();
        fs.create("a/x").unwrap();
        let snap = snapshot(&mut fs);
        let paths: Vec<_> = snap.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/a/x"]);
    }
}
