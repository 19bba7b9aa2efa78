//! Block storage for regular files
//!
//! A regular file's bytes live in an ordered list of fixed-size blocks.
//! Byte `i` of the logical stream is `blocks[i / block_size][i % block_size]`.
//! The store keeps exactly `ceil(size / block_size)` blocks at all times.

/// Block-backed byte stream of one regular file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStore {
    block_size: usize,
    blocks: Vec<Box<[u8]>>,
    size: usize,
}

impl BlockStore {
    /// Creates an empty store
    pub fn new(block_size: usize) -> Self {
        debug_assert!(block_size > 0, "block size must be non-zero");
        Self {
            block_size,
            blocks: Vec::new(),
            size: 0,
        }
    }

    /// Number of blocks needed to hold `size` bytes
    pub fn blocks_for(size: usize, block_size: usize) -> usize {
        size.div_ceil(block_size)
    }

    /// Logical size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of allocated blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Bytes per block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Grows or shrinks the store to exactly `new_size` bytes
    ///
    /// New blocks are zero-filled. When shrinking, the bytes past `new_size`
    /// in the last kept block are zeroed so that a later grow exposes zeros.
    pub fn resize(&mut self, new_size: usize) {
        let required = Self::blocks_for(new_size, self.block_size);

        if new_size < self.size {
            self.blocks.truncate(required);
            let tail = new_size % self.block_size;
            if tail != 0 {
                if let Some(last) = self.blocks.last_mut() {
                    last[tail..].fill(0);
                }
            }
        }

        while self.blocks.len() < required {
            self.blocks.push(vec![0u8; self.block_size].into_boxed_slice());
        }

        self.size = new_size;
    }

    /// Writes `data` starting at byte `offset`, growing the store as needed
    ///
    /// Returns the number of bytes written (always `data.len()`).
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> usize {
        let end = offset + data.len();
        if end > self.size {
            self.resize(end);
        }

        let mut written = 0;
        while written < data.len() {
            let pos = offset + written;
            let block = pos / self.block_size;
            let within = pos % self.block_size;
            let chunk = (self.block_size - within).min(data.len() - written);
            self.blocks[block][within..within + chunk]
                .copy_from_slice(&data[written..written + chunk]);
            written += chunk;
        }
        written
    }

    /// Reads up to `len` bytes starting at byte `offset`
    ///
    /// The read is clamped to the end of the stream; reading at or past the
    /// end yields an empty buffer.
    pub fn read_at(&self, offset: usize, len: usize) -> Vec<u8> {
        let available = self.size.saturating_sub(offset);
        let len = len.min(available);
        let mut out = Vec::with_capacity(len);

        let mut pos = offset;
        while out.len() < len {
            let block = pos / self.block_size;
            let within = pos % self.block_size;
            let chunk = (self.block_size - within).min(len - out.len());
            out.extend_from_slice(&self.blocks[block][within..within + chunk]);
            pos += chunk;
        }
        out
    }
}
