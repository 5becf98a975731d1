//! Kinematic Body
//!
//! Shared rectangle physics for the player and every hostile actor:
//! horizontal acceleration or friction, gravity, integration and world
//! bounds. Platform resolution lives in [`crate::game::collision`].

use serde::{Serialize, Deserialize};

use crate::core::fixed::{
    Fixed, apply_friction, fixed_clamp,
    GRAVITY, MAX_FALL_SPEED, JUMP_VELOCITY,
    RUN_ACCELERATION, MAX_RUN_SPEED, GROUND_FRICTION,
};
use crate::core::vec2::FixedVec2;
use crate::game::collision::Rect;

/// Horizontal facing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    Left = 0,
    #[default]
    Right = 1,
}

impl Facing {
    /// -1 for left, +1 for right.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    /// Reverse direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

// =============================================================================
// BODY
// =============================================================================

/// A physically simulated rectangle.
///
/// `position` is the top-left corner. Health is unsigned and never exceeds
/// `max_health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub position: FixedVec2,

    /// Width and height
    pub size: FixedVec2,

    /// Per-tick displacement
    pub velocity: FixedVec2,

    /// Position before the latest integration step
    pub last_position: FixedVec2,

    /// Resting on a platform top
    pub on_ground: bool,

    /// Last horizontal direction of travel or intent
    pub facing: Facing,

    /// Current health
    pub health: u32,

    /// Maximum health
    pub max_health: u32,
}

impl Body {
    /// Create a body at full health, at rest.
    pub fn new(position: FixedVec2, size: FixedVec2, max_health: u32) -> Self {
        Self {
            position,
            size,
            velocity: FixedVec2::ZERO,
            last_position: position,
            on_ground: false,
            facing: Facing::Right,
            health: max_health,
            max_health,
        }
    }

    /// Bounding rectangle at the current position.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::at(self.position, self.size)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> FixedVec2 {
        self.rect().center()
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> Fixed {
        self.position.y + self.size.y
    }

    /// Subtract health, flooring at zero. Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Add health, clamping at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_health - self.health);
        self.health += restored;
        restored
    }

    /// Place the body at `point` with no motion.
    pub fn respawn(&mut self, point: FixedVec2) {
        self.position = point;
        self.last_position = point;
        self.velocity = FixedVec2::ZERO;
        self.on_ground = false;
    }

    /// Check the health contract.
    #[inline]
    pub fn health_in_bounds(&self) -> bool {
        self.health <= self.max_health
    }
}

// =============================================================================
// PHYSICS CONFIG
// =============================================================================

/// Kinematic tuning shared by every body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration per tick
    pub gravity: Fixed,
    /// Cap on downward speed
    pub max_fall_speed: Fixed,
    /// Vertical impulse on jump (negative is up)
    pub jump_velocity: Fixed,
    /// Horizontal acceleration while a direction is held
    pub run_acceleration: Fixed,
    /// Cap on horizontal speed
    pub max_run_speed: Fixed,
    /// Multiplicative horizontal decay with no input
    pub ground_friction: Fixed,
    /// Health lost when falling out of the world
    pub fall_penalty: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            jump_velocity: JUMP_VELOCITY,
            run_acceleration: RUN_ACCELERATION,
            max_run_speed: MAX_RUN_SPEED,
            ground_friction: GROUND_FRICTION,
            fall_penalty: 20,
        }
    }
}

// =============================================================================
// INTEGRATION
// =============================================================================

/// Accelerate toward `direction` (-1, 0, +1) or apply friction when zero.
pub fn steer(body: &mut Body, direction: i32, config: &PhysicsConfig) {
    match direction.signum() {
        0 => {
            body.velocity.x = apply_friction(body.velocity.x, config.ground_friction);
        }
        sign => {
            body.velocity.x = fixed_clamp(
                body.velocity.x + sign * config.run_acceleration,
                -config.max_run_speed,
                config.max_run_speed,
            );
            body.facing = if sign < 0 { Facing::Left } else { Facing::Right };
        }
    }
}

/// Jump if grounded. Returns whether the impulse was applied.
pub fn try_jump(body: &mut Body, config: &PhysicsConfig) -> bool {
    if !body.on_ground {
        return false;
    }
    body.velocity.y = config.jump_velocity;
    body.on_ground = false;
    true
}

/// Apply gravity, move by velocity and clamp to the world.
///
/// Returns `true` when the body dropped below `fall_limit`; the caller
/// decides how to recover.
pub fn integrate(
    body: &mut Body,
    config: &PhysicsConfig,
    world_width: Fixed,
    fall_limit: Fixed,
) -> bool {
    if !body.on_ground {
        body.velocity.y = (body.velocity.y + config.gravity).min(config.max_fall_speed);
    }

    body.last_position = body.position;
    body.position = body.position + body.velocity;

    let max_x = (world_width - body.size.x).max(0);
    if body.position.x < 0 || body.position.x > max_x {
        body.position.x = fixed_clamp(body.position.x, 0, max_x);
        body.velocity.x = 0;
    }
    if body.position.y < 0 {
        body.position.y = 0;
        body.velocity.y = body.velocity.y.max(0);
    }

    body.position.y > fall_limit
}

// =============================================================================
// TESTS
// =============================================================================
