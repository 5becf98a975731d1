//! Game Logic Module
//!
//! All combat and physics simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Per-tick intents and delta-compressed recordings
//! - `collision`: Rectangles and platform resolution
//! - `body`: Kinematic bodies, gravity, run and jump
//! - `enemy`: Hostile actors, pursuit AI, status effects
//! - `combo`: Hit streak and damage multiplier tiers
//! - `catalog`: Ability definitions
//! - `ability`: Slots, activation and effect execution
//! - `projectile`: Projectiles and transient effects
//! - `combat`: Melee resolution and the shared death path
//! - `events`: Game events for hosts and replay checks
//! - `state`: World state and hashing
//! - `level`: Level geometry and roster
//! - `snapshot`: Presentation view of a tick
//! - `tick`: Fixed-timestep simulation loop

pub mod input;
pub mod collision;
pub mod body;
pub mod enemy;
pub mod combo;
pub mod catalog;
pub mod ability;
pub mod projectile;
pub mod combat;
pub mod events;
pub mod state;
pub mod level;
pub mod snapshot;
pub mod tick;

// Re-export key types
pub use input::{InputFrame, InputDelta, InputRecording};
pub use state::{WorldState, Player, Outcome, SimPhase, Progression};
pub use catalog::{AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityId};
pub use ability::{ActivationOutcome, RejectReason};
pub use enemy::{ActorId, EnemyKind, HostileActor};
pub use level::Level;
pub use snapshot::WorldSnapshot;
pub use tick::{FixedTimestep, SimConfig, Simulation, TickResult, replay};
pub use events::{GameEvent, GameEventData, DamageSource};
