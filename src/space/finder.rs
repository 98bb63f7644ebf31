//! Free-space discovery over the occupied footprint.

use crate::format::Span;

/// Compute the free gaps between occupied spans
///
/// Spans are sorted by offset; each strictly positive gap between two
/// consecutive occupied spans becomes a free space. Nothing is
/// synthesized before the first occupied span (the slack behind the
/// header is not tracked) or after the last one (the unallocated tail
/// belongs to the allocator's append fallback).
pub fn free_spaces(occupied: &[Span]) -> Vec<Span> {
    let mut spans = occupied.to_vec();
    spans.sort_by_key(|span| span.offset);

    let mut spaces = Vec::new();
    for pair in spans.windows(2) {
        let gap_offset = pair[0].end();
        if pair[1].offset > gap_offset {
            spaces.push(Span::new(gap_offset, pair[1].offset - gap_offset));
        }
    }
    spaces
}

/// Offset one past the last occupied byte; 0 when nothing is occupied
pub fn data_end(occupied: &[Span]) -> u64 {
    occupied.iter().map(Span::end).max().unwrap_or(0)
}
