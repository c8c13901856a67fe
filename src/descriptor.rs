//! Buffer descriptors: per-chunk metadata over externally-owned memory.
//!
//! A descriptor records where one fixed-size chunk lives (`data`), how large
//! it is (`capacity`), and whether it is currently handed out. It never owns
//! or dereferences the memory it describes; descriptor storage and chunk
//! storage are both supplied by the caller and outlive the descriptor's use.
//!
//! # Invariants
//! - An uninitialized descriptor is inert: reads degrade to `None`/zero and
//!   mark operations are no-ops.
//! - `data` and `capacity` are written only by [`BufferDesc::init`], which
//!   requires `&mut self`. After initialization only the availability flag
//!   mutates, and it is atomic.
//! - A descriptor initialized with no backing memory or zero capacity is
//!   permanently unacquirable, but still counts as initialized so fixed
//!   arrays keep their bookkeeping.
//!
//! # Threading
//! The availability flag is an `AtomicBool` with relaxed ordering so it can
//! be observed across an interrupt-vs-mainline split without tearing. The
//! flag is read and written as two separate operations on the acquire path
//! (no compare-and-swap); see the pool module for the resulting contract.

use std::ptr::NonNull;

#[cfg(loom)]
use loom::sync::atomic::{AtomicBool, Ordering};
#[cfg(not(loom))]
use std::sync::atomic::{AtomicBool, Ordering};

/// Metadata record for one fixed-size chunk of caller-owned memory.
///
/// Descriptors start uninitialized (see [`BufferDesc::UNINIT`]) and become
/// live through [`BufferDesc::init`]. They are usually stored in a fixed
/// array the caller hands to a pool or buffer array:
///
/// ```
/// use bufpool_rs::BufferDesc;
///
/// static DESCRIPTORS: [BufferDesc; 4] = [BufferDesc::UNINIT; 4];
/// assert!(!DESCRIPTORS[0].is_initialized());
/// ```
#[derive(Debug)]
pub struct BufferDesc {
    // Backing chunk, if any. Written only by `init`.
    data: Option<NonNull<u8>>,
    // Chunk capacity in bytes. Written only by `init`.
    capacity: usize,
    // The only field that mutates after `init`.
    available: AtomicBool,
    // Set once by `init`; never cleared.
    initialized: bool,
}

// SAFETY: `data` and `capacity` are written only through `&mut self` in
// `init`, so shared references observe them read-only. `available` is
// atomic. The descriptor itself never dereferences `data`; payload access
// is an explicit unsafe operation with its own contract.
unsafe impl Send for BufferDesc {}
// SAFETY: as above; all shared-reference mutation goes through the atomic
// availability flag.
unsafe impl Sync for BufferDesc {}

impl BufferDesc {
    /// An uninitialized descriptor, usable in array repeat expressions for
    /// `static` or stack storage.
    #[cfg(not(loom))]
    pub const UNINIT: BufferDesc = BufferDesc::new();

    /// Creates an uninitialized descriptor.
    #[cfg(not(loom))]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: None,
            capacity: 0,
            available: AtomicBool::new(false),
            initialized: false,
        }
    }

    /// Creates an uninitialized descriptor (loom builds; loom atomics have
    /// no const constructor).
    #[cfg(loom)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: None,
            capacity: 0,
            available: AtomicBool::new(false),
            initialized: false,
        }
    }

    /// Binds the descriptor to a chunk of memory.
    ///
    /// Sets `data` and `capacity` unconditionally and marks the descriptor
    /// initialized. The descriptor becomes available only when `data` is
    /// present and `capacity` is non-zero; otherwise it stays permanently
    /// unacquirable while still counting as initialized.
    ///
    /// Re-initializing an already-bound descriptor is allowed and simply
    /// rebinds it; callers that do this while the old chunk is handed out
    /// get the same pointer-identity behavior the original layout had.
    pub fn init(&mut self, data: Option<NonNull<u8>>, capacity: usize) {
        self.data = data;
        self.capacity = capacity;
        self.initialized = true;
        let usable = data.is_some() && capacity != 0;
        self.available.store(usable, Ordering::Relaxed);
    }

    /// Returns true once [`init`](Self::init) has run.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the backing memory reference.
    ///
    /// `None` when the descriptor is uninitialized or was initialized with
    /// no backing memory. Pure read; no side effects.
    #[inline]
    #[must_use]
    pub fn data(&self) -> Option<NonNull<u8>> {
        if self.initialized {
            self.data
        } else {
            None
        }
    }

    /// Returns the chunk capacity in bytes, or 0 when uninitialized.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        if self.initialized {
            self.capacity
        } else {
            0
        }
    }

    /// Returns true when the descriptor can be handed out by an acquire scan.
    ///
    /// # Warning
    /// This is a snapshot; under concurrent access it may be stale by the
    /// time the caller acts on it.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.initialized && self.available.load(Ordering::Relaxed)
    }

    /// Returns the descriptor to the available state.
    ///
    /// No-op on an uninitialized descriptor, and on one with no backing
    /// memory or zero capacity; those never become acquirable.
    #[inline]
    pub fn mark_free(&self) {
        if self.is_usable() {
            self.available.store(true, Ordering::Relaxed);
        }
    }

    /// Takes the descriptor out of the available state.
    ///
    /// No-op on an uninitialized descriptor. No other field changes.
    #[inline]
    pub fn mark_in_use(&self) {
        if self.initialized {
            self.available.store(false, Ordering::Relaxed);
        }
    }

    /// Views the backing chunk as a mutable byte slice.
    ///
    /// Returns an empty slice when the descriptor is uninitialized or has no
    /// backing memory.
    ///
    /// # Safety
    /// The caller must guarantee exclusive access to the chunk for the
    /// lifetime of the returned slice (the pool does not prevent the same
    /// descriptor being handed out twice under unserialized concurrent
    /// acquire) and that the memory the descriptor was initialized over is
    /// still live.
    #[must_use]
    pub unsafe fn as_mut_slice(&self) -> &mut [u8] {
        match self.data() {
            // SAFETY: `init` recorded this pointer with `capacity` bytes of
            // backing storage; liveness and uniqueness are the caller's
            // contract per the function-level safety requirements.
            Some(ptr) => unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), self.capacity) },
            None => &mut [],
        }
    }

    // Initialized with real backing memory; the only state acquire may return.
    #[inline]
    fn is_usable(&self) -> bool {
        self.initialized && self.data.is_some() && self.capacity != 0
    }
}

#[cfg(not(loom))]
impl Default for BufferDesc {
    fn default() -> Self {
        Self::new()
    }
}
