//! End-to-end contract tests for the public buffer-pool API.
//!
//! These walk the observable allocation properties a driver would rely on:
//! bounded hand-out, deterministic first-fit order, pointer-identity
//! release, bulk reset, and silent degradation on bad input.

use std::ptr::NonNull;

use bufpool_rs::{BufferArray, BufferArrayError, BufferDesc, BufferPool};

const COUNT: usize = 3;
const CHUNK: usize = 64;

fn offset_of(block_base: *const u8, ptr: NonNull<u8>) -> usize {
    ptr.as_ptr() as usize - block_base as usize
}

#[test]
fn exactly_count_acquires_then_absent() {
    let mut descs = [BufferDesc::UNINIT; COUNT];
    let mut block = [0u8; COUNT * CHUNK];
    let buffers = BufferArray::new(&mut descs, &mut block, COUNT, CHUNK).unwrap();

    let mut held = Vec::new();
    for _ in 0..COUNT {
        held.push(buffers.acquire().expect("within configured count"));
    }
    assert!(buffers.acquire().is_none(), "count+1 acquire must be absent");
}

#[test]
fn acquire_order_follows_block_offsets() {
    let mut descs = [BufferDesc::UNINIT; COUNT];
    let mut block = [0u8; COUNT * CHUNK];
    let base = block.as_ptr();
    let buffers = BufferArray::new(&mut descs, &mut block, COUNT, CHUNK).unwrap();

    for i in 0..COUNT {
        let desc = buffers.acquire().unwrap();
        assert_eq!(offset_of(base, desc.data().unwrap()), i * CHUNK);
        assert_eq!(desc.capacity(), CHUNK);
    }
}

#[test]
fn release_then_acquire_round_trips_the_same_range() {
    let mut descs = [BufferDesc::UNINIT; COUNT];
    let mut block = [0u8; COUNT * CHUNK];
    let buffers = BufferArray::new(&mut descs, &mut block, COUNT, CHUNK).unwrap();

    let held: Vec<_> = (0..COUNT).map(|_| buffers.acquire().unwrap()).collect();
    let middle = held[1].data().unwrap();

    assert!(buffers.release_by_ptr(middle));
    let again = buffers.acquire().expect("released chunk is reusable");
    assert_eq!(again.data(), Some(middle));
    assert!(buffers.acquire().is_none(), "only one chunk was released");
}

#[test]
fn dma_style_scenario_three_chunks_of_64() {
    let mut descs = [BufferDesc::UNINIT; COUNT];
    let mut block = [0u8; COUNT * CHUNK];
    let base = block.as_ptr();
    let buffers = BufferArray::new(&mut descs, &mut block, COUNT, CHUNK).unwrap();

    // Three distinct hand-outs, each a full chunk.
    let held: Vec<_> = (0..COUNT).map(|_| buffers.acquire().unwrap()).collect();
    for desc in &held {
        assert_eq!(desc.capacity(), CHUNK);
    }
    let mut ptrs: Vec<_> = held.iter().map(|d| d.data().unwrap()).collect();
    ptrs.dedup();
    assert_eq!(ptrs.len(), COUNT, "hand-outs must be distinct");

    // Fourth acquire: absent.
    assert!(buffers.acquire().is_none());

    // Release all three by their base offsets (0, 64, 128).
    for i in 0..COUNT {
        let ptr = NonNull::new(unsafe { base.cast_mut().add(i * CHUNK) }).unwrap();
        assert!(buffers.release_by_ptr(ptr));
    }

    // First-fit: the next acquire is the offset-0 chunk.
    let first = buffers.acquire().unwrap();
    assert_eq!(offset_of(base, first.data().unwrap()), 0);
}

#[test]
fn foreign_pointer_release_fails_and_changes_nothing() {
    let mut descs = [BufferDesc::UNINIT; COUNT];
    let mut block = [0u8; COUNT * CHUNK];
    let buffers = BufferArray::new(&mut descs, &mut block, COUNT, CHUNK).unwrap();

    let _held = buffers.acquire().unwrap();
    let before = buffers.available();

    let mut foreign = [0u8; CHUNK];
    let foreign_ptr = NonNull::new(foreign.as_mut_ptr()).unwrap();
    assert!(!buffers.release_by_ptr(foreign_ptr));
    assert_eq!(buffers.available(), before);
}

#[test]
fn release_of_free_chunk_is_a_successful_no_op() {
    let mut descs = [BufferDesc::UNINIT; COUNT];
    let mut block = [0u8; COUNT * CHUNK];
    let buffers = BufferArray::new(&mut descs, &mut block, COUNT, CHUNK).unwrap();

    let desc = buffers.acquire().unwrap();
    let ptr = desc.data().unwrap();
    assert!(buffers.release_by_ptr(ptr));
    assert!(buffers.release_by_ptr(ptr), "second release still reports a match");
    assert_eq!(buffers.available(), COUNT);
}

#[test]
fn mark_all_free_recovers_full_capacity_regardless_of_history() {
    let mut descs = [BufferDesc::UNINIT; COUNT];
    let mut block = [0u8; COUNT * CHUNK];
    let buffers = BufferArray::new(&mut descs, &mut block, COUNT, CHUNK).unwrap();

    // Tangle the state: partial acquire, one release, another acquire.
    let a = buffers.acquire().unwrap();
    let _b = buffers.acquire().unwrap();
    buffers.release_by_ptr(a.data().unwrap());
    let _c = buffers.acquire().unwrap();

    buffers.mark_all_free();
    for _ in 0..COUNT {
        assert!(buffers.acquire().is_some());
    }
    assert!(buffers.acquire().is_none());
}

#[test]
fn zero_capacity_descriptor_is_locatable_but_dead() {
    let mut probe = [0u8; 1];
    let ptr = NonNull::new(probe.as_mut_ptr());

    let mut descs = [BufferDesc::UNINIT; 2];
    descs[0].init(ptr, 0);

    let pool = BufferPool::new(&descs);
    assert!(pool.acquire().is_none(), "zero capacity is never acquirable");
    assert!(pool.find(ptr.unwrap()).is_some(), "still visible to find");
    assert!(pool.release_by_ptr(ptr.unwrap()));
    assert!(pool.acquire().is_none(), "release cannot resurrect it");
}

#[test]
fn construction_errors_carry_the_offending_numbers() {
    let mut descs = [BufferDesc::UNINIT; 2];
    let mut block = [0u8; 64];

    let err = BufferArray::new(&mut descs, &mut block, 2, 64).unwrap_err();
    assert_eq!(
        err,
        BufferArrayError::BlockTooSmall {
            required: 128,
            actual: 64
        }
    );
    assert!(err.to_string().contains("128"));
}

#[test]
fn pool_over_static_uninitialized_descriptors_degrades() {
    // Descriptor arrays can live in `static` storage. A pool may be bound
    // before anyone initializes them; until then every slot is skipped.
    static DESCRIPTORS: [BufferDesc; 2] = [BufferDesc::UNINIT; 2];

    let pool = BufferPool::new(&DESCRIPTORS);
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.available(), 0);
    assert!(pool.acquire().is_none());
}
