//! Level Data
//!
//! Static geometry, player spawn and the hostile roster for one session.
//! Levels load from JSON so the host can ship its own content; [`Level::demo`]
//! is the built-in arena used by the binary, tests and benches.

use serde::{Serialize, Deserialize};

use crate::core::vec2::FixedVec2;
use crate::error::DataError;
use crate::game::collision::{Platform, PlatformKind};
use crate::game::enemy::{ActorId, EnemyKind, HostileActor};

/// Largest level coordinate in pixels. Q16.16 tops out at 32767, and
/// bodies travel past the fall limit before they respawn.
pub const MAX_COORD: i32 = 16_384;

fn default_vital() -> u32 {
    100
}

/// Axis-aligned platform in integer pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub kind: PlatformKind,
}

/// One hostile actor to spawn. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub kind: EnemyKind,
    pub x: i32,
    pub y: i32,
    /// Overrides the kind's default health
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<u32>,
}

impl RosterEntry {
    /// Build the actor for this entry.
    pub fn spawn(&self, id: ActorId) -> HostileActor {
        let position = FixedVec2::from_ints(self.x, self.y);
        match self.max_health {
            Some(max_health) => HostileActor::with_max_health(id, self.kind, position, max_health),
            None => HostileActor::new(id, self.kind, position),
        }
    }
}

/// A playable level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Right world edge in pixels
    pub world_width: i32,
    /// Bodies whose top passes below this y fell out
    pub fall_limit: i32,
    /// Player top-left spawn
    pub player_spawn: [i32; 2],
    #[serde(default = "default_vital")]
    pub player_max_health: u32,
    #[serde(default = "default_vital")]
    pub player_max_mana: u32,
    /// Resolved in list order
    pub platforms: Vec<PlatformSpec>,
    /// Actor ids follow list order
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl Level {
    /// Parse and validate a level.
    pub fn from_json_str(s: &str) -> Result<Self, DataError> {
        let level: Level = serde_json::from_str(s)?;
        level.validate()?;
        Ok(level)
    }

    /// Reject geometry the simulation cannot run.
    pub fn validate(&self) -> Result<(), DataError> {
        let invalid = |msg: String| -> Result<(), DataError> {
            Err(DataError::InvalidLevel(format!("{}: {}", self.name, msg)))
        };

        if self.world_width <= 0 || self.world_width > MAX_COORD {
            return invalid(format!("world_width must be in 1..={}, got {}", MAX_COORD, self.world_width));
        }
        if self.fall_limit <= 0 || self.fall_limit > MAX_COORD {
            return invalid(format!("fall_limit must be in 1..={}, got {}", MAX_COORD, self.fall_limit));
        }
        if self.player_max_health == 0 {
            return invalid("player_max_health must be positive".to_string());
        }
        let [sx, sy] = self.player_spawn;
        if sx < 0 || sx >= self.world_width || sy < 0 || sy > self.fall_limit {
            return invalid(format!("player spawn ({}, {}) outside the world", sx, sy));
        }
        for (i, p) in self.platforms.iter().enumerate() {
            if p.w <= 0 || p.h <= 0 {
                return invalid(format!("platform {} has empty extent {}x{}", i, p.w, p.h));
            }
            let in_range = |v: i64| (-(MAX_COORD as i64)..=MAX_COORD as i64).contains(&v);
            let (x, y) = (p.x as i64, p.y as i64);
            if !in_range(x) || !in_range(y) || !in_range(x + p.w as i64) || !in_range(y + p.h as i64) {
                return invalid(format!("platform {} lies outside -{max}..={max} pixels", i, max = MAX_COORD));
            }
        }
        for (i, entry) in self.roster.iter().enumerate() {
            if entry.max_health == Some(0) {
                return invalid(format!("roster entry {} has zero health", i));
            }
            if entry.x < 0 || entry.x >= self.world_width || entry.y < 0 || entry.y > self.fall_limit {
                return invalid(format!("roster entry {} at ({}, {}) outside the world", i, entry.x, entry.y));
            }
        }
        Ok(())
    }

    /// Platforms in fixed-point form.
    pub fn platforms(&self) -> Vec<Platform> {
        self.platforms
            .iter()
            .map(|p| Platform::from_ints(p.x, p.y, p.w, p.h, p.kind))
            .collect()
    }

    /// Player spawn in fixed-point form.
    pub fn spawn_point(&self) -> FixedVec2 {
        FixedVec2::from_ints(self.player_spawn[0], self.player_spawn[1])
    }

    /// Built-in arena: a long ground strip, a floating ledge, a building
    /// and one actor of each kind standing on the ground (top at y=500).
    pub fn demo() -> Self {
        Self {
            name: "demo".to_string(),
            world_width: 2400,
            fall_limit: 900,
            player_spawn: [100, 440],
            player_max_health: 100,
            player_max_mana: 100,
            platforms: vec![
                PlatformSpec { x: 0, y: 500, w: 2400, h: 100, kind: PlatformKind::Ground },
                PlatformSpec { x: 600, y: 380, w: 200, h: 20, kind: PlatformKind::Platform },
                PlatformSpec { x: 1400, y: 300, w: 200, h: 200, kind: PlatformKind::Building },
            ],
            roster: vec![
                RosterEntry { kind: EnemyKind::Weak, x: 500, y: 452, max_health: None },
                RosterEntry { kind: EnemyKind::Medium, x: 1000, y: 444, max_health: None },
                RosterEntry { kind: EnemyKind::Elite, x: 1900, y: 428, max_health: None },
            ],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_is_valid() {
        let level = Level::demo();
        assert!(level.validate().is_ok());
        assert_eq!(level.platforms().len(), 3);
        assert_eq!(level.spawn_point(), FixedVec2::from_ints(100, 440));
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let json = r#"{
            "name": "pit",
            "world_width": 800,
            "fall_limit": 600,
            "player_spawn": [10, 100],
            "platforms": [{"x": 0, "y": 400, "w": 300, "h": 50, "kind": "ground"}],
            "roster": [{"kind": "weak", "x": 200, "y": 352, "max_health": 30}]
        }"#;
        let level = Level::from_json_str(json).unwrap();
        assert_eq!(level.player_max_health, 100);
        assert_eq!(level.player_max_mana, 100);

        let actor = level.roster[0].spawn(ActorId(0));
        assert_eq!(actor.body.max_health, 30);
        assert_eq!(actor.body.health, 30);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let mut level = Level::demo();
        level.world_width = 0;
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));

        let mut level = Level::demo();
        level.platforms[1].w = 0;
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));

        let mut level = Level::demo();
        level.roster[0].max_health = Some(0);
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));

        let mut level = Level::demo();
        level.player_spawn = [5000, 0];
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_coordinates_beyond_fixed_range() {
        let mut level = Level::demo();
        level.world_width = 40_000;
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));

        let mut level = Level::demo();
        level.fall_limit = MAX_COORD + 1;
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));

        let mut level = Level::demo();
        level.platforms[0].w = i32::MAX;
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));

        let mut level = Level::demo();
        level.platforms[2].y = -20_000;
        assert!(matches!(level.validate(), Err(DataError::InvalidLevel(_))));

        let json = r#"{
            "name": "vast",
            "world_width": 40000,
            "fall_limit": 600,
            "player_spawn": [10, 100],
            "platforms": []
        }"#;
        assert!(matches!(Level::from_json_str(json), Err(DataError::InvalidLevel(_))));

        let mut level = Level::demo();
        level.world_width = MAX_COORD;
        level.platforms[0].w = MAX_COORD;
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(Level::from_json_str("{"), Err(DataError::Json(_))));
    }
}
