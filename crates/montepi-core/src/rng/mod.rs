//! Counter-based random number generation.
//!
//! Every work item owns a generator positioned by `(seed, offset)` rather than
//! by mutable history:
//! - Stateless (state is the counter value)
//! - Parallel-friendly (disjoint offsets give disjoint sub-streams)
//! - Reproducible (same seed and offset = same output)

mod philox;
mod traits;

pub use philox::{PhiloxRng, PhiloxState};
pub use traits::CounterRng;
