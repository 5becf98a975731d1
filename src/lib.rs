//! # Rift Brawler
//!
//! Deterministic combat and physics simulation core for a 2D side-scrolling
//! action game: one player, a roster of hostile actors, platforms, a combo
//! meter and six ability slots.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RIFT BRAWLER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── rng.rs      - Xorshift128+ and the RandomSource seam    │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Simulation (deterministic)                │
//! │  ├── input.rs    - Intent frames and recordings              │
//! │  ├── collision.rs- Rectangles and platform resolution        │
//! │  ├── body.rs     - Gravity, run, jump, world clamp           │
//! │  ├── enemy.rs    - Hostile actors and pursuit                │
//! │  ├── combo.rs    - Hit streak multiplier                     │
//! │  ├── catalog.rs  - Ability definitions                       │
//! │  ├── ability.rs  - Slots, activation, effects, deferred      │
//! │  ├── projectile.rs - Projectiles and transient effects       │
//! │  ├── combat.rs   - Melee and the shared death path           │
//! │  ├── events.rs   - Ordered game events                       │
//! │  ├── state.rs    - World state                               │
//! │  ├── level.rs    - Level data                                │
//! │  ├── snapshot.rs - Presentation view                         │
//! │  └── tick.rs     - Fixed-timestep loop                       │
//! │                                                              │
//! │  runtime.rs      - Real-time tokio host (non-deterministic)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic
//! - No HashMap (ordered Vec / BTreeMap iteration only)
//! - No system time dependencies
//! - All randomness from an injected, seeded source
//!
//! Given identical inputs and RNG seed, the simulation produces
//! **identical state hashes** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod game;
pub mod runtime;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::rng::{DeterministicRng, RandomSource};
pub use error::DataError;
pub use game::input::{InputFrame, InputRecording};
pub use game::level::Level;
pub use game::catalog::AbilityCatalog;
pub use game::tick::{SimConfig, Simulation};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
