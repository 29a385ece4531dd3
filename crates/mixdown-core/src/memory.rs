//! Memory blocks, chunks and the pool contract
//!
//! The real allocator lives in the server outside this crate; what the
//! mixing core needs from it is the ownership contract: reference-
//! counted blocks (`Arc<MemBlock>`), chunk views into them, and the
//! acquire/release discipline around every read or mutation. Views are
//! handed out through `RwLock::try_read`/`try_write`, so acquiring
//! never blocks: overlapping acquisition is a violation of the caller's
//! exclusivity discipline and panics instead of waiting.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::sample::SampleSpec;

/// Source of fixed-size audio blocks.
pub struct MemPool {
    block_size_max: usize,
}

impl MemPool {
    /// Create a pool handing out blocks of at most `block_size_max` bytes.
    pub fn new(block_size_max: usize) -> Self {
        assert!(block_size_max > 0);
        Self { block_size_max }
    }

    /// Largest block this pool will allocate.
    pub fn block_size_max(&self) -> usize {
        self.block_size_max
    }

    /// Allocate a zero-filled block of `length` bytes.
    ///
    /// Panics if `length` is zero or exceeds the pool's maximum.
    pub fn new_block(&self, length: usize) -> Arc<MemBlock> {
        assert!(length > 0 && length <= self.block_size_max);
        Arc::new(MemBlock::with_length(length))
    }
}

/// A reference-counted block of raw audio bytes.
pub struct MemBlock {
    length: usize,
    data: RwLock<Box<[u8]>>,
    is_silence: AtomicBool,
}

impl MemBlock {
    fn with_length(length: usize) -> Self {
        Self {
            length,
            data: RwLock::new(vec![0u8; length].into_boxed_slice()),
            is_silence: AtomicBool::new(false),
        }
    }

    /// Length of the block in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Acquire a shared read view of the block's bytes.
    ///
    /// Never blocks; panics if a write view is currently held.
    pub fn acquire(&self) -> RwLockReadGuard<'_, Box<[u8]>> {
        match self.data.try_read() {
            Ok(view) => view,
            Err(_) => panic!("read view requested while a write view is held"),
        }
    }

    /// Acquire the exclusive write view of the block's bytes.
    ///
    /// Never blocks; panics if any other view is currently held.
    pub fn acquire_mut(&self) -> RwLockWriteGuard<'_, Box<[u8]>> {
        match self.data.try_write() {
            Ok(view) => view,
            Err(_) => panic!("write view requested while another view is held"),
        }
    }

    /// True if this block is known to contain only silence bytes.
    pub fn is_silence(&self) -> bool {
        self.is_silence.load(Ordering::Relaxed)
    }

    /// Mark the block as (not) containing only silence bytes.
    pub fn set_is_silence(&self, silence: bool) {
        self.is_silence.store(silence, Ordering::Relaxed);
    }
}

impl fmt::Debug for MemBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemBlock")
            .field("length", &self.length)
            .field("is_silence", &self.is_silence())
            .finish()
    }
}

/// A byte range within a shared block.
#[derive(Debug, Clone)]
pub struct MemChunk {
    pub block: Arc<MemBlock>,
    /// Byte offset of the chunk within the block.
    pub index: usize,
    /// Byte length of the chunk.
    pub length: usize,
}

impl MemChunk {
    /// Create a chunk view over `block`.
    ///
    /// Panics if the range falls outside the block.
    pub fn new(block: Arc<MemBlock>, index: usize, length: usize) -> Self {
        assert!(index + length <= block.len());
        Self { block, index, length }
    }

    /// View over the whole block.
    pub fn whole(block: Arc<MemBlock>) -> Self {
        let length = block.len();
        Self { block, index: 0, length }
    }

    /// True if the chunk covers a whole number of frames of `spec`.
    pub fn is_frame_aligned(&self, spec: &SampleSpec) -> bool {
        self.length % spec.frame_size() == 0
    }
}
