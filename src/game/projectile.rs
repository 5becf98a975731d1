//! Projectiles & Transient Effects
//!
//! Projectiles travel in a straight line, expire after a fixed number of
//! steps and are consumed by the first hostile actor they reach. Transient
//! effects are presentation records that only age.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::game::combat::{apply_damage, CombatConfig};
use crate::game::events::DamageSource;
use crate::game::state::WorldState;

/// Visual tag shared by projectiles and transient effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EffectTag {
    Bolt = 0,
    Barrage = 1,
    Slash = 2,
    Shockwave = 3,
    Blink = 4,
    MeteorMarker = 5,
    MeteorImpact = 6,
    CorpseBurst = 7,
    Aura = 8,
    Annihilation = 9,
    Smite = 10,
}

/// A moving damage carrier. `position` is its center.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub position: FixedVec2,
    /// Displacement per tick
    pub velocity: FixedVec2,
    pub damage: u32,
    /// Steps left before expiry
    pub lifetime: u32,
    pub tag: EffectTag,
    /// Slot of the ability that fired it
    pub source_slot: u8,
}

/// Presentation-only record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransientEffect {
    pub anchor: Option<FixedVec2>,
    pub radius: Option<Fixed>,
    pub tag: EffectTag,
    /// Ticks left
    pub remaining: u32,
}

impl TransientEffect {
    /// Effect at a point.
    pub fn at(anchor: FixedVec2, tag: EffectTag, remaining: u32) -> Self {
        Self { anchor: Some(anchor), radius: None, tag, remaining }
    }

    /// Effect covering a circle.
    pub fn area(anchor: FixedVec2, radius: Fixed, tag: EffectTag, remaining: u32) -> Self {
        Self { anchor: Some(anchor), radius: Some(radius), tag, remaining }
    }
}

/// Move, age and collide every projectile.
///
/// Expired projectiles are dropped before collision. A live projectile hits
/// the lowest-index living actor whose center is strictly within
/// `hit_radius`, deals its damage through the shared death path and is
/// removed; it never reaches a second actor.
pub fn advance_projectiles(state: &mut WorldState, hit_radius: Fixed, combat: &CombatConfig) {
    let projectiles = std::mem::take(&mut state.projectiles);
    let mut kept = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        projectile.position = projectile.position + projectile.velocity;
        projectile.lifetime = projectile.lifetime.saturating_sub(1);
        if projectile.lifetime == 0 {
            continue;
        }

        let target = state
            .enemies
            .iter()
            .find(|e| e.alive && projectile.position.within_radius(e.body.center(), hit_radius))
            .map(|e| e.id);

        match target {
            Some(actor) => {
                tracing::trace!(projectile = projectile.id, %actor, "projectile hit");
                apply_damage(
                    state,
                    actor,
                    projectile.damage,
                    DamageSource::Projectile { id: projectile.id },
                    combat,
                );
            }
            None => kept.push(projectile),
        }
    }

    state.projectiles = kept;
}

/// Age effects by one tick and drop expired ones.
pub fn age_effects(effects: &mut Vec<TransientEffect>) {
    for effect in effects.iter_mut() {
        effect.remaining = effect.remaining.saturating_sub(1);
    }
    effects.retain(|e| e.remaining > 0);
}

// =============================================================================
// TESTS
// =============================================================================
