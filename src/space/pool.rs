//! Best-fit allocation over a free-space snapshot.

use crate::format::{self, Span, HEADER_LEN, MIN_CHUNK_LEN};

/// Allocates target spans for one write operation
///
/// Owns a snapshot of the free-space list; every provided span is
/// removed from it so a single operation can never hand the same
/// space out twice. When no free span qualifies, the pool fabricates
/// an append span at the end of the known data and grows the file.
pub struct SpacePool {
    spaces: Vec<Span>,
    append_at: u64,
}

impl SpacePool {
    /// Build a pool from the free-space snapshot and the occupied data end
    pub fn new(spaces: Vec<Span>, data_end: u64) -> Self {
        Self {
            spaces,
            append_at: data_end.max(HEADER_LEN),
        }
    }

    /// Select the free span whose length diverges least from `required`
    ///
    /// Exact fits win immediately. Otherwise the minimum absolute
    /// divergence wins; a tie between a surplus and a shortfall of the
    /// same magnitude goes to the surplus. Spans below the minimum
    /// usable envelope size are never candidates. With no candidate at
    /// all, returns an append span of `max(required, 60)` bytes at the
    /// end of the data and advances the append cursor past it.
    pub fn provide(&mut self, required: u64) -> Span {
        let mut best: Option<(usize, u64, bool)> = None;

        for (i, space) in self.spaces.iter().enumerate() {
            if !format::is_usable(space) {
                continue;
            }
            let (divergence, surplus) = if space.length >= required {
                (space.length - required, true)
            } else {
                (required - space.length, false)
            };
            if divergence == 0 {
                best = Some((i, 0, true));
                break;
            }
            best = match best {
                None => Some((i, divergence, surplus)),
                Some((_, best_divergence, best_surplus))
                    if divergence < best_divergence
                        || (divergence == best_divergence && !best_surplus && surplus) =>
                {
                    Some((i, divergence, surplus))
                }
                keep => keep,
            };
        }

        match best {
            Some((i, _, _)) => self.spaces.remove(i),
            None => {
                let span = Span::new(self.append_at, required.max(MIN_CHUNK_LEN));
                self.append_at = span.end();
                span
            }
        }
    }
}
