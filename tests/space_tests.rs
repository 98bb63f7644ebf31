//! Tests for free-space discovery and best-fit allocation
//!
//! These tests verify:
//! - Gap computation between sorted occupied spans
//! - No synthesized spans before the first or after the last span
//! - Best-fit selection: exact match, minimum divergence, tie-breaking
//! - Append fallback at the end of the data

use flatkv::format::{Span, HEADER_LEN, MIN_CHUNK_LEN};
use flatkv::space::{data_end, free_spaces, SpacePool};

// =============================================================================
// Free-Space Finder Tests
// =============================================================================

#[test]
fn test_free_spaces_between_occupied_spans() {
    // Deliberately unsorted
    let occupied = vec![
        Span::new(300, 100),
        Span::new(20, 80),
        Span::new(160, 40),
    ];
    let spaces = free_spaces(&occupied);
    assert_eq!(spaces, vec![Span::new(100, 60), Span::new(200, 100)]);
}

#[test]
fn test_free_spaces_skips_adjacent_spans() {
    let occupied = vec![Span::new(20, 80), Span::new(100, 50)];
    assert!(free_spaces(&occupied).is_empty());
}

#[test]
fn test_free_spaces_nothing_before_first_or_after_last() {
    // Slack behind the header and the unallocated tail are not gaps
    let occupied = vec![Span::new(500, 100)];
    assert!(free_spaces(&occupied).is_empty());
    assert!(free_spaces(&[]).is_empty());
}

#[test]
fn test_data_end_is_max_span_end() {
    let occupied = vec![Span::new(20, 80), Span::new(300, 100), Span::new(160, 40)];
    assert_eq!(data_end(&occupied), 400);
    assert_eq!(data_end(&[]), 0);
}

// =============================================================================
// Best-Fit Allocator Tests
// =============================================================================

#[test]
fn test_pool_exact_fit_wins() {
    let free = vec![Span::new(100, 200), Span::new(400, 120), Span::new(600, 90)];
    let mut pool = SpacePool::new(free, 1000);
    assert_eq!(pool.provide(120), Span::new(400, 120));
}

#[test]
fn test_pool_minimum_divergence_wins() {
    let free = vec![Span::new(100, 200), Span::new(400, 130), Span::new(600, 90)];
    let mut pool = SpacePool::new(free, 1000);
    // 120 requested: divergences are 80, 10, 30
    assert_eq!(pool.provide(120), Span::new(400, 130));
}

#[test]
fn test_pool_tie_prefers_surplus_over_shortfall() {
    // Shortfall listed first; surplus of the same magnitude must win
    let free = vec![Span::new(100, 110), Span::new(400, 130)];
    let mut pool = SpacePool::new(free, 1000);
    assert_eq!(pool.provide(120), Span::new(400, 130));

    // And an already-chosen surplus is kept over a later shortfall
    let free = vec![Span::new(400, 130), Span::new(100, 110)];
    let mut pool = SpacePool::new(free, 1000);
    assert_eq!(pool.provide(120), Span::new(400, 130));
}

#[test]
fn test_pool_selected_span_is_consumed() {
    let free = vec![Span::new(100, 120)];
    let mut pool = SpacePool::new(free, 1000);
    assert_eq!(pool.provide(120), Span::new(100, 120));
    // Second request finds the list empty and appends
    assert_eq!(pool.provide(120), Span::new(1000, 120));
}

#[test]
fn test_pool_skips_unusable_spans() {
    let free = vec![Span::new(100, MIN_CHUNK_LEN - 1)];
    let mut pool = SpacePool::new(free, 1000);
    assert_eq!(pool.provide(59), Span::new(1000, MIN_CHUNK_LEN));
}

#[test]
fn test_pool_append_fallback_grows_from_data_end() {
    let mut pool = SpacePool::new(Vec::new(), 500);
    assert_eq!(pool.provide(100), Span::new(500, 100));
    // Cursor advanced past the first append
    assert_eq!(pool.provide(80), Span::new(600, 80));
}

#[test]
fn test_pool_append_never_overlaps_header() {
    let mut pool = SpacePool::new(Vec::new(), 0);
    assert_eq!(pool.provide(100), Span::new(HEADER_LEN, 100));
}

#[test]
fn test_pool_append_clamps_to_minimum_chunk() {
    let mut pool = SpacePool::new(Vec::new(), 500);
    assert_eq!(pool.provide(42), Span::new(500, MIN_CHUNK_LEN));
}
