//! Free-Space Discovery and Allocation
//!
//! The store never compacts: space freed by overwrites and deletions
//! stays where it is and is rediscovered as the gaps between the
//! occupied spans of all live chains. Allocation picks the free span
//! whose size diverges least from the request, falling back to growing
//! the file at the end of the data.

mod finder;
mod pool;

pub use finder::{data_end, free_spaces};
pub use pool::SpacePool;
