//! Core deterministic primitives.
//!
//! Everything the tick touches is built from these: fixed-point scalars and
//! vectors, a seeded random source, and state hashing for replay checks.

pub mod fixed;
pub mod vec2;
pub mod rng;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use vec2::FixedVec2;
pub use rng::{DeterministicRng, RandomSource, ConstantRoll};
pub use hash::{StateHash, compute_state_hash};
