//! Enemy Behavior
//!
//! Hostile actors: roster entries with a kinematic body, an attack cooldown
//! and timed status effects. The AI is deliberately minimal: walk toward
//! the player when close enough and grounded, otherwise slide to a stop.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{
    Fixed, from_int, fixed_abs, apply_friction,
    PURSUIT_SPEED, ENEMY_FRICTION,
};
use crate::core::vec2::FixedVec2;
use crate::game::body::{Body, Facing, PhysicsConfig, integrate};
use crate::game::collision::{Platform, resolve_platforms};

/// Roster index of a hostile actor.
///
/// Stable for the whole session: dead actors stay in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    /// Index into the roster.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Hostile actor tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EnemyKind {
    Weak = 0,
    Medium = 1,
    Elite = 2,
}

impl EnemyKind {
    /// Default health for this tier.
    pub fn max_health(self) -> u32 {
        match self {
            EnemyKind::Weak => 50,
            EnemyKind::Medium => 100,
            EnemyKind::Elite => 200,
        }
    }

    /// Body extent for this tier.
    pub fn size(self) -> FixedVec2 {
        match self {
            EnemyKind::Weak => FixedVec2::from_ints(36, 48),
            EnemyKind::Medium => FixedVec2::from_ints(44, 56),
            EnemyKind::Elite => FixedVec2::from_ints(60, 72),
        }
    }
}

// =============================================================================
// STATUS EFFECTS
// =============================================================================

/// Timed condition on a hostile actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StatusKind {
    /// No pursuit, no attacks
    Stunned = 0,
    /// Pursuit speed halved
    Slowed = 1,
}

/// Active status with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining_ticks: u32,
}

// =============================================================================
// HOSTILE ACTOR
// =============================================================================

/// One roster entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileActor {
    /// Roster index
    pub id: ActorId,

    /// Tier
    pub kind: EnemyKind,

    /// Physical state
    pub body: Body,

    /// False forever once health reaches zero
    pub alive: bool,

    /// Ticks until the next strike is allowed (0 = ready)
    pub attack_cooldown: u32,

    /// Active status effects, at most one per kind
    pub statuses: Vec<StatusEffect>,

    /// Fall-out recovery point
    pub spawn_point: FixedVec2,
}

impl HostileActor {
    /// Create an actor with the tier's default health.
    pub fn new(id: ActorId, kind: EnemyKind, position: FixedVec2) -> Self {
        Self::with_max_health(id, kind, position, kind.max_health())
    }

    /// Create an actor with an explicit health pool.
    pub fn with_max_health(
        id: ActorId,
        kind: EnemyKind,
        position: FixedVec2,
        max_health: u32,
    ) -> Self {
        Self {
            id,
            kind,
            body: Body::new(position, kind.size(), max_health),
            alive: true,
            attack_cooldown: 0,
            statuses: Vec::new(),
            spawn_point: position,
        }
    }

    /// Check if a status is active.
    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|s| s.kind == kind && s.remaining_ticks > 0)
    }

    /// Apply a status. Re-applying refreshes the duration.
    pub fn apply_status(&mut self, kind: StatusKind, duration_ticks: u32) {
        if duration_ticks == 0 {
            return;
        }
        match self.statuses.iter_mut().find(|s| s.kind == kind) {
            Some(existing) => existing.remaining_ticks = duration_ticks,
            None => self.statuses.push(StatusEffect { kind, remaining_ticks: duration_ticks }),
        }
    }

    /// Age statuses by one tick, dropping expired ones.
    pub fn tick_statuses(&mut self) {
        for status in &mut self.statuses {
            status.remaining_ticks = status.remaining_ticks.saturating_sub(1);
        }
        self.statuses.retain(|s| s.remaining_ticks > 0);
    }

    /// Whether this actor may strike right now.
    #[inline]
    pub fn can_strike(&self) -> bool {
        self.alive && self.attack_cooldown == 0 && !self.has_status(StatusKind::Stunned)
    }
}

// =============================================================================
// AI
// =============================================================================

/// Pursuit tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Horizontal center distance under which a grounded actor pursues
    pub pursuit_range: Fixed,
    /// Horizontal speed while pursuing
    pub pursuit_speed: Fixed,
    /// Multiplicative decay when not pursuing
    pub friction: Fixed,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            pursuit_range: from_int(400),
            pursuit_speed: PURSUIT_SPEED,
            friction: ENEMY_FRICTION,
        }
    }
}

/// Set horizontal velocity toward the player, or decay it.
///
/// Returns whether the actor is pursuing this tick.
pub fn update_pursuit(actor: &mut HostileActor, player_center: FixedVec2, config: &EnemyConfig) -> bool {
    let dx = player_center.x - actor.body.center().x;
    let pursuing = actor.body.on_ground
        && !actor.has_status(StatusKind::Stunned)
        && fixed_abs(dx) < config.pursuit_range;

    if pursuing {
        let speed = if actor.has_status(StatusKind::Slowed) {
            config.pursuit_speed / 2
        } else {
            config.pursuit_speed
        };
        actor.body.velocity.x = dx.signum() * speed;
        if dx < 0 {
            actor.body.facing = Facing::Left;
        } else if dx > 0 {
            actor.body.facing = Facing::Right;
        }
    } else {
        actor.body.velocity.x = apply_friction(actor.body.velocity.x, config.friction);
    }
    pursuing
}

/// Geometry an actor moves through.
pub struct Terrain<'a> {
    pub platforms: &'a [Platform],
    pub world_width: Fixed,
    pub fall_limit: Fixed,
}

/// Full per-tick update for one alive actor: pursuit, kinematics, platform
/// resolution, cooldown and status aging.
///
/// Returns `true` if the actor fell out of the world and was moved back to
/// its spawn point; the caller applies the fall penalty.
pub fn advance_actor(
    actor: &mut HostileActor,
    player_center: FixedVec2,
    physics: &PhysicsConfig,
    config: &EnemyConfig,
    terrain: &Terrain<'_>,
) -> bool {
    update_pursuit(actor, player_center, config);

    let fell_out = integrate(&mut actor.body, physics, terrain.world_width, terrain.fall_limit);
    if fell_out {
        actor.body.respawn(actor.spawn_point);
    }
    resolve_platforms(&mut actor.body, terrain.platforms);

    actor.attack_cooldown = actor.attack_cooldown.saturating_sub(1);
    actor.tick_statuses();

    fell_out
}

// =============================================================================
// TESTS
// =============================================================================
