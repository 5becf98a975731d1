//! Combat Resolver
//!
//! Proximity melee in both directions, plus [`apply_damage`]: the single
//! path through which any hostile actor loses health or dies. Scoring and
//! experience are awarded there and nowhere else.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, from_int, fixed_abs, scale_amount};
use crate::core::rng::RandomSource;
use crate::game::body::Body;
use crate::game::combo::ComboConfig;
use crate::game::enemy::ActorId;
use crate::game::events::{DamageSource, GameEvent};
use crate::game::state::WorldState;

/// Melee and scoring tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Max horizontal center distance for a player swing (exclusive)
    pub player_melee_range: Fixed,
    /// Max vertical center distance for a player swing (exclusive)
    pub player_melee_tolerance: Fixed,
    pub player_melee_base: u32,
    /// Random bonus is uniform in `[0, bonus]`
    pub player_melee_bonus: u32,
    /// Ticks between basic swings
    pub player_swing_cooldown: u32,

    pub hostile_melee_range: Fixed,
    pub hostile_melee_tolerance: Fixed,
    pub hostile_melee_base: u32,
    pub hostile_melee_bonus: u32,
    /// Ticks an actor waits after striking
    pub hostile_attack_cooldown: u32,

    /// Random bonus added to every ability hit
    pub ability_damage_bonus: u32,
    /// Score per point of the victim's max health
    pub score_per_max_health: u32,
    /// Experience is max health divided by this
    pub experience_divisor: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_melee_range: from_int(60),
            player_melee_tolerance: from_int(50),
            player_melee_base: 15,
            player_melee_bonus: 10,
            player_swing_cooldown: 20,
            hostile_melee_range: from_int(40),
            hostile_melee_tolerance: from_int(40),
            hostile_melee_base: 5,
            hostile_melee_bonus: 5,
            hostile_attack_cooldown: 60,
            ability_damage_bonus: 5,
            score_per_max_health: 10,
            experience_divisor: 2,
        }
    }
}

impl CombatConfig {
    /// Score awarded for killing an actor with this health pool.
    pub fn score_for(&self, max_health: u32) -> u32 {
        max_health.saturating_mul(self.score_per_max_health)
    }

    /// Experience awarded for killing an actor with this health pool.
    pub fn experience_for(&self, max_health: u32) -> u32 {
        max_health.checked_div(self.experience_divisor).unwrap_or(0)
    }
}

/// Outcome of one damage application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    /// Health actually removed
    pub dealt: u32,
    /// This application killed the actor
    pub killed: bool,
}

/// True iff the centers are strictly within `range` horizontally and
/// `tolerance` vertically.
pub fn in_melee_reach(attacker: &Body, target: &Body, range: Fixed, tolerance: Fixed) -> bool {
    let a = attacker.center();
    let t = target.center();
    fixed_abs(t.x - a.x) < range && fixed_abs(t.y - a.y) < tolerance
}

// =============================================================================
// SHARED DAMAGE PATH
// =============================================================================

/// Damage a hostile actor.
///
/// Dead or unknown actors are ignored, so an actor can die at most once.
/// On death the actor is marked not alive, the score and experience payload
/// is recorded in the progression totals and an `ActorDied` event is
/// emitted.
pub fn apply_damage(
    state: &mut WorldState,
    id: ActorId,
    amount: u32,
    source: DamageSource,
    config: &CombatConfig,
) -> DamageReport {
    let tick = state.tick;
    let Some(actor) = state.enemies.get_mut(id.index()) else {
        return DamageReport::default();
    };
    if !actor.alive {
        return DamageReport::default();
    }

    let dealt = actor.body.take_damage(amount);
    debug_assert!(actor.body.health_in_bounds());
    let remaining = actor.body.health;
    let killed = remaining == 0;
    let kind = actor.kind;
    let max_health = actor.body.max_health;
    if killed {
        actor.alive = false;
        actor.statuses.clear();
    }

    if dealt > 0 {
        state.push_event(GameEvent::actor_damaged(tick, id, dealt, remaining, source));
    }

    if killed {
        let score = config.score_for(max_health);
        let experience = config.experience_for(max_health);
        state.progression.record_kill(score, experience);
        tracing::debug!(%id, ?kind, score, experience, ?source, "actor died");
        state.push_event(GameEvent::actor_died(tick, id, kind, score, experience, source));
    }

    DamageReport { dealt, killed }
}

/// Damage the player, flooring at zero. Returns the amount removed.
pub fn damage_player(state: &mut WorldState, amount: u32, cause: DamageSource) -> u32 {
    let old = state.player.body.health;
    let dealt = state.player.body.take_damage(amount);
    debug_assert!(state.player.body.health_in_bounds());

    if dealt > 0 {
        let new = state.player.body.health;
        state.push_event(GameEvent::player_health_changed(state.tick, old, new, cause));
    }
    dealt
}

// =============================================================================
// MELEE
// =============================================================================

/// Player swing: hits every living actor in reach.
///
/// Gated by the attack intent and the swing cooldown. Each target takes an
/// independent roll scaled by the combo multiplier held before the swing.
/// A connecting swing registers one combo hit; a whiff breaks the combo.
pub fn resolve_player_melee<R: RandomSource>(
    state: &mut WorldState,
    rng: &mut R,
    config: &CombatConfig,
    combo: &ComboConfig,
) {
    if !state.input.attack_pressed() || state.player.melee_cooldown > 0 {
        return;
    }
    state.player.melee_cooldown = config.player_swing_cooldown;

    let targets: Vec<ActorId> = state
        .enemies
        .iter()
        .filter(|e| {
            e.alive
                && in_melee_reach(
                    &state.player.body,
                    &e.body,
                    config.player_melee_range,
                    config.player_melee_tolerance,
                )
        })
        .map(|e| e.id)
        .collect();

    if targets.is_empty() {
        let change = state.combo.break_combo(combo);
        state.note_tier_change(change);
        return;
    }

    let multiplier = state.combo.multiplier;
    for id in targets {
        let roll = config.player_melee_base + rng.roll(config.player_melee_bonus);
        let amount = scale_amount(roll, multiplier);
        apply_damage(state, id, amount, DamageSource::PlayerMelee, config);
    }

    let change = state.combo.register_hit(combo);
    state.note_tier_change(change);
}

/// Hostile strikes: every ready actor in reach hits the player once and
/// restarts its own cooldown.
pub fn resolve_hostile_melee<R: RandomSource>(
    state: &mut WorldState,
    rng: &mut R,
    config: &CombatConfig,
) {
    for index in 0..state.enemies.len() {
        if state.player.is_dead() {
            break;
        }
        let actor = &state.enemies[index];
        if !actor.can_strike()
            || !in_melee_reach(
                &actor.body,
                &state.player.body,
                config.hostile_melee_range,
                config.hostile_melee_tolerance,
            )
        {
            continue;
        }

        let id = actor.id;
        let amount = config.hostile_melee_base + rng.roll(config.hostile_melee_bonus);
        damage_player(state, amount, DamageSource::Hostile { actor: id });
        state.enemies[index].attack_cooldown = config.hostile_attack_cooldown;
        tracing::trace!(%id, amount, "hostile strike");
    }
}

// =============================================================================
// TESTS
// =============================================================================
