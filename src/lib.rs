//! Fixed-size, fixed-count buffer pooling over caller-owned memory.
//!
//! ## Scope
//! This crate carves a caller-supplied contiguous memory block into
//! equal-size chunks and hands them out on demand without ever touching a
//! dynamic allocator. It targets deterministic I/O paths (DMA and UART
//! staging in embedded firmware, RTOS task pools, interrupt-driven drivers)
//! where allocation must be bounded, fragmentation-free, and callable from
//! restricted contexts.
//!
//! ## Key invariants
//! - No allocation, ever: descriptor storage and payload memory are supplied
//!   by and remain owned by the caller for the life of the structures.
//! - Acquire order is deterministic ascending-index first-fit, an observable
//!   property callers may rely on.
//! - Every operation is O(count), non-blocking, and silently degrades on
//!   invalid input instead of faulting.
//! - The availability flag cannot tear, but acquire is read-then-flip with
//!   no compare-and-swap: concurrent acquire from two execution contexts can
//!   hand out the same chunk twice. Serialize externally if that matters.
//!
//! ## Layering
//! `BufferDesc` (per-chunk metadata) -> `BufferPool` (linear-scan
//! acquire/release/find over a descriptor array) -> `BufferArray` (slices
//! one flat block into chunks and binds a pool over them).
//!
//! ## Notable entry points
//! - [`BufferArray::new`]: the usual way in; block and descriptors in, pool
//!   out.
//! - [`BufferPool::new`]: bind a pool over descriptors you initialized
//!   yourself.
//! - [`BufferDesc::UNINIT`]: seed for `static` descriptor arrays.
//!
//! ## Design trade-offs
//! Linear scan instead of a free-list keeps allocation order observable and
//! the code path auditable for interrupt contexts; pools here are small and
//! fixed. Failure ambiguity (an empty pool and an exhausted pool both yield
//! `None`) is the cost of an API with no fatal paths.

pub mod buffer_array;
pub mod descriptor;
pub mod pool;
#[cfg(test)]
pub mod test_utils;

pub use buffer_array::{BufferArray, BufferArrayError};
pub use descriptor::BufferDesc;
pub use pool::BufferPool;
