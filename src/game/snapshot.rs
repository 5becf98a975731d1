//! Presentation Snapshots
//!
//! Read-only view of a tick for renderers and external consumers. Positions
//! are converted to floats here and only here; nothing in a snapshot feeds
//! back into the simulation.

use serde::Serialize;

use crate::core::fixed::to_float;
use crate::game::body::Facing;
use crate::game::enemy::{EnemyKind, StatusKind};
use crate::game::projectile::EffectTag;
use crate::game::state::{SimPhase, WorldState};

/// Player body, vitals and combo meter.
#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub position: (f32, f32),
    pub size: (f32, f32),
    pub facing: Facing,
    pub on_ground: bool,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub combo_hits: u32,
    pub combo_tier: u8,
    pub combo_multiplier: f32,
}

/// One hostile actor, dead ones included.
#[derive(Clone, Debug, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub position: (f32, f32),
    pub size: (f32, f32),
    pub facing: Facing,
    pub health: u32,
    pub max_health: u32,
    pub alive: bool,
    pub statuses: Vec<StatusKind>,
}

/// A live projectile.
#[derive(Clone, Debug, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub position: (f32, f32),
    pub tag: EffectTag,
}

/// A transient visual effect.
#[derive(Clone, Debug, Serialize)]
pub struct EffectView {
    pub tag: EffectTag,
    pub position: Option<(f32, f32)>,
    pub radius: Option<f32>,
    pub remaining: u32,
}

/// One ability slot.
#[derive(Clone, Debug, Serialize)]
pub struct SlotView {
    pub ability: Option<String>,
    pub cooldown: u32,
    pub max_cooldown: u32,
}

/// Everything a renderer needs for one tick.
#[derive(Clone, Debug, Serialize)]
pub struct WorldSnapshot {
    pub tick: u32,
    pub phase: SimPhase,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub slots: Vec<SlotView>,
    pub score: u32,
    pub experience: u32,
}

impl WorldSnapshot {
    /// Capture the current state.
    pub fn capture(state: &WorldState) -> Self {
        let player = &state.player;
        Self {
            tick: state.tick,
            phase: state.phase,
            player: PlayerView {
                position: player.body.position.to_floats(),
                size: player.body.size.to_floats(),
                facing: player.body.facing,
                on_ground: player.body.on_ground,
                health: player.body.health,
                max_health: player.body.max_health,
                mana: player.mana,
                max_mana: player.max_mana,
                combo_hits: state.combo.hits,
                combo_tier: state.combo.tier,
                combo_multiplier: to_float(state.combo.multiplier),
            },
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id.0,
                    kind: e.kind,
                    position: e.body.position.to_floats(),
                    size: e.body.size.to_floats(),
                    facing: e.body.facing,
                    health: e.body.health,
                    max_health: e.body.max_health,
                    alive: e.alive,
                    statuses: e.statuses.iter().map(|s| s.kind).collect(),
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    position: p.position.to_floats(),
                    tag: p.tag,
                })
                .collect(),
            effects: state
                .effects
                .iter()
                .map(|e| EffectView {
                    tag: e.tag,
                    position: e.anchor.map(|a| a.to_floats()),
                    radius: e.radius.map(to_float),
                    remaining: e.remaining,
                })
                .collect(),
            slots: state
                .slots
                .iter()
                .map(|s| SlotView {
                    ability: s.ability.as_ref().map(|a| a.as_str().to_string()),
                    cooldown: s.cooldown,
                    max_cooldown: s.max_cooldown,
                })
                .collect(),
            score: state.progression.score,
            experience: state.progression.experience,
        }
    }

    /// Render as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
