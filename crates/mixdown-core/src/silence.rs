//! Silence generation and the per-encoding silence cache
//!
//! Silence is not always zero: unsigned samples idle at their bias
//! point and the companded encodings at their zero codes. The fill
//! helpers stamp a buffer with the right byte for its encoding; the
//! [`SilenceCache`] keeps one pre-filled block per distinct silence
//! byte pattern so underrun substitution never allocates on the I/O
//! path. Encodings that share a pattern share the same block.

use std::sync::Arc;

use crate::layout::frame_align;
use crate::memory::{MemBlock, MemChunk, MemPool};
use crate::sample::{SampleFormat, SampleSpec};

/// Upper bound for cached silence blocks (sixteen 4 KiB pages).
pub const SILENCE_MAX: usize = 64 * 1024;

/// Fill raw bytes with the silence pattern of `spec`'s encoding.
pub fn silence_memory(data: &mut [u8], spec: &SampleSpec) {
    assert!(!data.is_empty());
    assert!(spec.is_valid());
    data.fill(spec.format.silence_byte());
}

/// Fill a chunk's byte range with silence, in place.
pub fn silence_chunk(chunk: &MemChunk, spec: &SampleSpec) {
    assert!(chunk.length > 0);
    let mut view = chunk.block.acquire_mut();
    silence_memory(&mut view[chunk.index..chunk.index + chunk.length], spec);
}

/// Fill a whole block with silence and mark it as such.
pub fn silence_block(block: &Arc<MemBlock>, spec: &SampleSpec) {
    {
        let mut view = block.acquire_mut();
        silence_memory(&mut view, spec);
    }
    block.set_is_silence(true);
}

/// Cache of pre-filled silence blocks, one per encoding.
///
/// Owned, explicit state: create with [`SilenceCache::new`], pass by
/// reference, drop or [`reset`](SilenceCache::reset) at shutdown.
/// Population requires `&mut self`, so concurrent first-time fills are
/// ruled out by the borrow rather than an internal lock.
pub struct SilenceCache {
    blocks: [Option<Arc<MemBlock>>; SampleFormat::COUNT],
}

impl SilenceCache {
    pub fn new() -> Self {
        Self {
            blocks: std::array::from_fn(|_| None),
        }
    }

    /// Drop all cached references and clear the table.
    ///
    /// Callers that obtained chunks from [`get_or_create`] hold their
    /// own block references; those stay valid after a reset.
    pub fn reset(&mut self) {
        for block in &mut self.blocks {
            *block = None;
        }
    }

    /// Get a silence chunk for `spec`, building the backing block on
    /// first use.
    ///
    /// The block is sized to `min(pool.block_size_max(), SILENCE_MAX)`
    /// and shared between every encoding with the same silence byte;
    /// one miss populates the whole alias group. The returned chunk is
    /// at most `length` bytes, frame-aligned; a `length` of zero (or
    /// past the block end) yields the largest aligned chunk available.
    pub fn get_or_create(
        &mut self,
        pool: &MemPool,
        spec: &SampleSpec,
        length: usize,
    ) -> MemChunk {
        assert!(spec.is_valid());

        let block = match &self.blocks[spec.format as usize] {
            Some(block) => Arc::clone(block),
            None => self.populate(pool, spec.format),
        };

        let mut length = if length == 0 || length > block.len() {
            block.len()
        } else {
            length
        };
        length = frame_align(length, spec);
        MemChunk::new(block, 0, length)
    }

    fn populate(&mut self, pool: &MemPool, format: SampleFormat) -> Arc<MemBlock> {
        let byte = format.silence_byte();
        let block = pool.new_block(pool.block_size_max().min(SILENCE_MAX));
        block.acquire_mut().fill(byte);
        block.set_is_silence(true);

        for alias in SampleFormat::ALL {
            if alias.silence_byte() == byte {
                self.blocks[alias as usize] = Some(Arc::clone(&block));
            }
        }
        block
    }
}

impl Default for SilenceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(format: SampleFormat) -> SampleSpec {
        SampleSpec {
            format,
            rate: 44100,
            channels: 2,
        }
    }

    #[test]
    fn u8_silence_is_bias_byte() {
        let block = MemPool::new(256).new_block(256);
        silence_block(&block, &spec(SampleFormat::U8));
        assert!(block.acquire().iter().all(|&b| b == 0x80));
        assert!(block.is_silence());
    }

    #[test]
    fn chunk_fill_touches_only_the_range() {
        let block = MemPool::new(64).new_block(64);
        block.acquire_mut().fill(0xaa);
        let chunk = MemChunk::new(Arc::clone(&block), 16, 32);
        silence_chunk(&chunk, &spec(SampleFormat::Ulaw));

        let view = block.acquire();
        assert!(view[..16].iter().all(|&b| b == 0xaa));
        assert!(view[16..48].iter().all(|&b| b == 0xff));
        assert!(view[48..].iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn cache_reuses_blocks() {
        let pool = MemPool::new(4096);
        let mut cache = SilenceCache::new();
        let a = cache.get_or_create(&pool, &spec(SampleFormat::S16Le), 128);
        let b = cache.get_or_create(&pool, &spec(SampleFormat::S16Le), 256);
        assert!(Arc::ptr_eq(&a.block, &b.block));
        assert_eq!(a.length, 128);
        assert_eq!(b.length, 256);
    }

    #[test]
    fn zero_pattern_encodings_alias_one_block() {
        let pool = MemPool::new(4096);
        let mut cache = SilenceCache::new();
        let s16le = cache.get_or_create(&pool, &spec(SampleFormat::S16Le), 0);
        let s16be = cache.get_or_create(&pool, &spec(SampleFormat::S16Be), 0);
        let f32le = cache.get_or_create(&pool, &spec(SampleFormat::Float32Le), 0);
        let s24 = cache.get_or_create(&pool, &spec(SampleFormat::S24Le), 0);
        assert!(Arc::ptr_eq(&s16le.block, &s16be.block));
        assert!(Arc::ptr_eq(&s16le.block, &f32le.block));
        assert!(Arc::ptr_eq(&s16le.block, &s24.block));

        let biased = cache.get_or_create(&pool, &spec(SampleFormat::U8), 0);
        assert!(!Arc::ptr_eq(&s16le.block, &biased.block));
    }

    #[test]
    fn returned_chunks_are_frame_aligned() {
        let pool = MemPool::new(4096);
        let mut cache = SilenceCache::new();
        // 6-byte frames (s16le, 3ch)
        let spec = SampleSpec {
            format: SampleFormat::S16Le,
            rate: 44100,
            channels: 3,
        };
        let chunk = cache.get_or_create(&pool, &spec, 100);
        assert_eq!(chunk.length, 96);
        assert_eq!(chunk.index, 0);

        let whole = cache.get_or_create(&pool, &spec, 0);
        assert_eq!(whole.length, frame_align(4096, &spec));
    }

    #[test]
    fn block_size_respects_pool_and_cap() {
        let pool = MemPool::new(1 << 20);
        let mut cache = SilenceCache::new();
        let chunk = cache.get_or_create(&pool, &spec(SampleFormat::S16Le), 0);
        assert_eq!(chunk.block.len(), SILENCE_MAX);

        let small_pool = MemPool::new(512);
        let mut cache = SilenceCache::new();
        let chunk = cache.get_or_create(&small_pool, &spec(SampleFormat::S16Le), 0);
        assert_eq!(chunk.block.len(), 512);
    }

    #[test]
    fn reset_clears_but_keeps_handed_out_chunks_valid() {
        let pool = MemPool::new(4096);
        let mut cache = SilenceCache::new();
        let before = cache.get_or_create(&pool, &spec(SampleFormat::Ulaw), 0);
        cache.reset();
        assert!(before.block.acquire().iter().all(|&b| b == 0xff));

        // repopulation after reset builds a fresh block
        let after = cache.get_or_create(&pool, &spec(SampleFormat::Ulaw), 0);
        assert!(!Arc::ptr_eq(&before.block, &after.block));
    }
}
