//! Buffer array context: one flat memory block carved into equal chunks.
//!
//! This is the composition layer. Construction slices a caller-owned block
//! into `count` chunks of `chunk_size` bytes, wires chunk `i` into
//! descriptor `i`, and binds a pool over the result. After that the context
//! adds nothing at runtime: acquire/find/release are pass-throughs to the
//! embedded pool. Its value is the construction-time slicing.
//!
//! # Invariants
//! - Every byte of the used block prefix maps to exactly one descriptor:
//!   chunk `i` covers `[i * chunk_size, (i + 1) * chunk_size)`.
//! - Chunk-to-descriptor association is permanent for the context lifetime.
//! - Construction either fully succeeds or changes nothing the caller can
//!   observe through this crate's API.
//!
//! Both the descriptor array and the block are borrowed for the context's
//! lifetime, so the caller cannot concurrently hold safe references into the
//! block while chunks are handed out. The crate never allocates; storage
//! placement (static, stack, heap) is entirely the caller's decision.

use std::fmt;
use std::ptr::NonNull;

use crate::descriptor::BufferDesc;
use crate::pool::BufferPool;

/// Errors returned by [`BufferArray::new`].
///
/// These all map to invalid construction input. Exhaustion is not an error:
/// an empty acquire result is an `Option::None`, matching the rest of the
/// crate's silent-degradation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferArrayError {
    /// `count` was zero.
    CountZero,
    /// `chunk_size` was zero.
    ChunkSizeZero,
    /// `count * chunk_size` does not fit in `usize`.
    CapacityOverflow { count: usize, chunk_size: usize },
    /// Fewer descriptor slots than requested buffers.
    StorageTooSmall { required: usize, actual: usize },
    /// The memory block cannot hold `count * chunk_size` bytes.
    BlockTooSmall { required: usize, actual: usize },
}

impl fmt::Display for BufferArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountZero => write!(f, "buffer count must be non-zero"),
            Self::ChunkSizeZero => write!(f, "chunk size must be non-zero"),
            Self::CapacityOverflow { count, chunk_size } => write!(
                f,
                "buffer layout overflows usize: {count} chunks of {chunk_size} bytes"
            ),
            Self::StorageTooSmall { required, actual } => write!(
                f,
                "descriptor storage too small: need {required} slots, have {actual}"
            ),
            Self::BlockTooSmall { required, actual } => write!(
                f,
                "memory block too small: need {required} bytes, have {actual}"
            ),
        }
    }
}

impl std::error::Error for BufferArrayError {}

/// A pool bound over one contiguous memory block sliced into equal chunks.
///
/// ```
/// use bufpool_rs::{BufferArray, BufferDesc};
///
/// let mut descriptors = [BufferDesc::UNINIT; 3];
/// let mut block = [0u8; 3 * 64];
///
/// let buffers = BufferArray::new(&mut descriptors, &mut block, 3, 64).unwrap();
/// let first = buffers.acquire().unwrap();
/// assert_eq!(first.capacity(), 64);
/// assert!(buffers.release_by_ptr(first.data().unwrap()));
/// ```
///
/// Layout is immutable after construction; only availability flags change.
#[derive(Debug, Clone, Copy)]
pub struct BufferArray<'a> {
    pool: BufferPool<'a>,
    chunk_size: usize,
}

impl<'a> BufferArray<'a> {
    /// Slices `block` into `count` chunks of `chunk_size` bytes, initializes
    /// one descriptor per chunk, and binds a pool over them.
    ///
    /// Oversized storage is tolerated: the first `count` descriptors and the
    /// first `count * chunk_size` bytes are used, trailing slots and bytes
    /// are left untouched.
    ///
    /// # Errors
    /// - [`BufferArrayError::CountZero`] / [`BufferArrayError::ChunkSizeZero`]
    ///   for zero parameters.
    /// - [`BufferArrayError::CapacityOverflow`] when the layout does not fit
    ///   in `usize`.
    /// - [`BufferArrayError::StorageTooSmall`] / [`BufferArrayError::BlockTooSmall`]
    ///   when the caller-supplied storage cannot hold the layout.
    pub fn new(
        descs: &'a mut [BufferDesc],
        block: &'a mut [u8],
        count: usize,
        chunk_size: usize,
    ) -> Result<Self, BufferArrayError> {
        if count == 0 {
            return Err(BufferArrayError::CountZero);
        }
        if chunk_size == 0 {
            return Err(BufferArrayError::ChunkSizeZero);
        }
        let required = count
            .checked_mul(chunk_size)
            .ok_or(BufferArrayError::CapacityOverflow { count, chunk_size })?;
        if descs.len() < count {
            return Err(BufferArrayError::StorageTooSmall {
                required: count,
                actual: descs.len(),
            });
        }
        if block.len() < required {
            return Err(BufferArrayError::BlockTooSmall {
                required,
                actual: block.len(),
            });
        }

        for (desc, chunk) in descs
            .iter_mut()
            .take(count)
            .zip(block.chunks_exact_mut(chunk_size))
        {
            desc.init(NonNull::new(chunk.as_mut_ptr()), chunk_size);
        }

        // The mutable borrows end here; the pool only needs shared access.
        let descs: &'a [BufferDesc] = descs;
        Ok(Self {
            pool: BufferPool::new(&descs[..count]),
            chunk_size,
        })
    }

    /// Claims the lowest-index available chunk. See [`BufferPool::acquire`].
    #[inline]
    pub fn acquire(&self) -> Option<&'a BufferDesc> {
        self.pool.acquire()
    }

    /// Finds the descriptor for a chunk base pointer. See [`BufferPool::find`].
    #[inline]
    pub fn find_by_ptr(&self, ptr: NonNull<u8>) -> Option<&'a BufferDesc> {
        self.pool.find(ptr)
    }

    /// Releases a chunk by its base pointer. See [`BufferPool::release_by_ptr`].
    #[inline]
    pub fn release_by_ptr(&self, ptr: NonNull<u8>) -> bool {
        self.pool.release_by_ptr(ptr)
    }

    /// Reclaims every chunk. See [`BufferPool::mark_all_free`].
    #[inline]
    pub fn mark_all_free(&self) {
        self.pool.mark_all_free();
    }

    /// Number of chunks the block was sliced into.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.pool.len()
    }

    /// Size of each chunk in bytes.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Snapshot of how many chunks an acquire could currently return.
    /// See the staleness warning on [`BufferPool::available`].
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.pool.available()
    }

    /// The descriptor array backing this context.
    #[inline]
    #[must_use]
    pub const fn descriptors(&self) -> &'a [BufferDesc] {
        self.pool.descriptors()
    }
}
