//! Ability Slots, Activation and Effects
//!
//! Six activation channels, the last reserved for a capstone ability.
//! Activation validates the slot against the catalog, cooldown and mana,
//! then dispatches on the definition's effect variant. Effects that land
//! later are queued as [`DeferredAction`]s keyed on tick count.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, from_int, fixed_clamp, scale_amount};
use crate::core::rng::RandomSource;
use crate::core::vec2::FixedVec2;
use crate::game::catalog::{AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityId};
use crate::game::combat::{apply_damage, in_melee_reach, CombatConfig};
use crate::game::enemy::{ActorId, StatusKind};
use crate::game::events::{DamageSource, GameEvent};
use crate::game::projectile::{EffectTag, TransientEffect};
use crate::game::state::{Player, WorldState};
use crate::game::tick::SimConfig;

/// Number of ability slots.
pub const SLOT_COUNT: usize = 6;

/// Slot reserved for the capstone ability.
pub const CAPSTONE_SLOT: usize = SLOT_COUNT - 1;

/// Horizontal gap between the player and a teleport-strike target.
const TELEPORT_OFFSET: Fixed = from_int(50);

/// Presentation lifetimes (ticks).
const SLASH_TICKS: u32 = 10;
const BURST_TICKS: u32 = 20;
const BLINK_TICKS: u32 = 12;
const ANNIHILATION_TICKS: u32 = 30;

// =============================================================================
// CONFIG
// =============================================================================

/// Resource and projectile tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    /// Mana restored per regen step
    pub mana_regen_amount: u32,
    /// Ticks between regen steps
    pub mana_regen_interval: u32,
    /// Projectile to actor-center hit distance (exclusive)
    pub projectile_hit_radius: Fixed,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            mana_regen_amount: 1,
            mana_regen_interval: 6,
            projectile_hit_radius: from_int(30),
        }
    }
}

// =============================================================================
// SLOTS
// =============================================================================

/// One activation channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    /// Bound ability, if any
    pub ability: Option<AbilityId>,
    /// Ticks until ready (0 = ready)
    pub cooldown: u32,
    /// Cooldown applied on activation
    pub max_cooldown: u32,
}

/// The full slot bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlots {
    slots: [AbilitySlot; SLOT_COUNT],
}

impl AbilitySlots {
    /// Get a slot.
    pub fn get(&self, index: usize) -> Option<&AbilitySlot> {
        self.slots.get(index)
    }

    /// Slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &AbilitySlot> {
        self.slots.iter()
    }

    /// Rebind slots from the learned set.
    ///
    /// Ordinary slots take the first eligible non-capstone abilities in
    /// catalog order; the reserved slot takes the first eligible capstone.
    /// Ids missing from the catalog are ignored. An ability that stays
    /// bound keeps its remaining cooldown.
    pub fn populate(&mut self, catalog: &AbilityCatalog, learned: &[AbilityId]) {
        let remaining: BTreeMap<AbilityId, u32> = self
            .slots
            .iter()
            .filter_map(|s| s.ability.clone().map(|id| (id, s.cooldown)))
            .collect();

        let eligible: Vec<&AbilityDefinition> =
            catalog.iter().filter(|d| learned.contains(&d.id)).collect();

        let bind = |def: Option<&&AbilityDefinition>| match def {
            Some(def) => AbilitySlot {
                ability: Some(def.id.clone()),
                cooldown: remaining.get(&def.id).copied().unwrap_or(0),
                max_cooldown: def.cooldown_ticks,
            },
            None => AbilitySlot::default(),
        };

        let ordinary: Vec<&&AbilityDefinition> =
            eligible.iter().filter(|d| !d.capstone).take(CAPSTONE_SLOT).collect();
        for (i, slot) in self.slots.iter_mut().take(CAPSTONE_SLOT).enumerate() {
            *slot = bind(ordinary.get(i).copied());
        }
        self.slots[CAPSTONE_SLOT] = bind(eligible.iter().find(|d| d.capstone));
    }

    /// Count every cooldown down by one tick.
    pub fn tick_cooldowns(&mut self) {
        for slot in &mut self.slots {
            slot.cooldown = slot.cooldown.saturating_sub(1);
        }
    }
}

// =============================================================================
// ACTIVATION
// =============================================================================

/// Why an activation was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    SlotOutOfRange,
    EmptySlot,
    /// Bound id is not in the catalog
    UnknownAbility,
    OnCooldown,
    InsufficientMana,
    /// Instant-target ability with no living hostile actor
    NoTarget,
    /// Session already ended
    NotPlaying,
}

/// Result of [`try_activate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated,
    Rejected(RejectReason),
}

impl ActivationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, ActivationOutcome::Activated)
    }
}

fn check_activation<'c>(
    state: &WorldState,
    catalog: &'c AbilityCatalog,
    slot: usize,
) -> Result<&'c AbilityDefinition, RejectReason> {
    if state.is_ended() {
        return Err(RejectReason::NotPlaying);
    }
    let bound = state.slots.get(slot).ok_or(RejectReason::SlotOutOfRange)?;
    let id = bound.ability.as_ref().ok_or(RejectReason::EmptySlot)?;
    let def = catalog.get(id).ok_or(RejectReason::UnknownAbility)?;
    if bound.cooldown > 0 {
        return Err(RejectReason::OnCooldown);
    }
    if state.player.mana < def.mana_cost {
        return Err(RejectReason::InsufficientMana);
    }
    if def.effect.requires_target() && state.first_alive_enemy().is_none() {
        return Err(RejectReason::NoTarget);
    }
    Ok(def)
}

/// Activate the ability in `slot`.
///
/// A rejected activation changes nothing (no mana, cooldown, RNG draw or
/// event). On success mana is spent, the slot cooldown restarts and the
/// effect executes.
pub fn try_activate<R: RandomSource>(
    state: &mut WorldState,
    catalog: &AbilityCatalog,
    config: &SimConfig,
    rng: &mut R,
    slot: usize,
) -> ActivationOutcome {
    let def = match check_activation(state, catalog, slot) {
        Ok(def) => def,
        Err(reason) => {
            tracing::debug!(slot, ?reason, "ability rejected");
            return ActivationOutcome::Rejected(reason);
        }
    };

    let old_mana = state.player.mana;
    state.player.mana -= def.mana_cost;
    state.slots.slots[slot].cooldown = def.cooldown_ticks;
    state.slots.slots[slot].max_cooldown = def.cooldown_ticks;

    let slot_tag = slot as u8;
    state.push_event(GameEvent::ability_activated(state.tick, slot_tag, def.id.clone()));
    if def.mana_cost > 0 {
        state.push_event(GameEvent::player_mana_changed(state.tick, old_mana, state.player.mana));
    }
    tracing::debug!(slot, ability = %def.id, kind = def.effect.kind_name(), "ability activated");

    execute(state, def, slot_tag, config, rng);
    ActivationOutcome::Activated
}

// =============================================================================
// EFFECT EXECUTOR
// =============================================================================

fn execute<R: RandomSource>(
    state: &mut WorldState,
    def: &AbilityDefinition,
    slot: u8,
    config: &SimConfig,
    rng: &mut R,
) {
    let combat = &config.combat;
    let source = DamageSource::Ability { slot };

    match def.effect {
        AbilityEffect::Melee { knockback, stun_ticks } => {
            cast_melee(state, def.damage, slot, from_int(knockback), stun_ticks, config, rng);
        }

        AbilityEffect::Projectile { speed, lifetime_ticks } => {
            let position = leading_edge(&state.player);
            let velocity = FixedVec2::new(state.player.body.facing.sign() * from_int(speed), 0);
            let damage = ability_roll(def.damage, combat, rng);
            state.spawn_projectile(position, velocity, damage, lifetime_ticks, EffectTag::Bolt, slot);
        }

        AbilityEffect::MultiProjectile { count, speed, lifetime_ticks, spread, stagger_ticks } => {
            let count = count.max(1);
            let position = leading_edge(&state.player);
            let vx = state.player.body.facing.sign() * from_int(speed);
            let each = ability_roll(def.damage, combat, rng) / count;

            for i in 0..count {
                let lane = 2 * i as i32 - (count as i32 - 1);
                let velocity = FixedVec2::new(vx, lane * from_int(spread) / 2);
                let delay = i * stagger_ticks;
                if delay == 0 {
                    state.spawn_projectile(position, velocity, each, lifetime_ticks, EffectTag::Barrage, slot);
                } else {
                    schedule(state, delay, DeferredKind::SpawnProjectile {
                        position,
                        velocity,
                        damage: each,
                        lifetime: lifetime_ticks,
                        slot,
                    });
                }
            }
        }

        AbilityEffect::Area { radius, slow_ticks } => {
            let center = state.player.body.center();
            let radius = from_int(radius);
            state.add_effect(TransientEffect::area(center, radius, EffectTag::Shockwave, BURST_TICKS));

            for id in actors_within(state, center, radius) {
                let amount = ability_roll(def.damage, combat, rng);
                let report = apply_damage(state, id, amount, source, combat);
                if !report.killed {
                    if let Some(actor) = state.enemy_mut(id) {
                        actor.apply_status(StatusKind::Slowed, slow_ticks);
                    }
                }
            }
        }

        AbilityEffect::TeleportStrike { delay_ticks } => {
            let Some(target) = state.first_alive_enemy() else {
                return;
            };
            let origin = state.player.body.center();
            teleport_beside(state, target);
            state.add_effect(TransientEffect::at(origin, EffectTag::Blink, BLINK_TICKS));
            state.add_effect(TransientEffect::at(state.player.body.center(), EffectTag::Blink, BLINK_TICKS));
            schedule(state, delay_ticks, DeferredKind::TeleportFollowUp {
                target,
                damage: def.damage,
                slot,
            });
        }

        AbilityEffect::InstantTarget => {
            let Some(target) = state.first_alive_enemy() else {
                return;
            };
            if let Some(actor) = state.enemy(target) {
                let at = actor.body.center();
                state.add_effect(TransientEffect::at(at, EffectTag::Smite, BURST_TICKS));
            }
            let amount = ability_roll(def.damage, combat, rng);
            apply_damage(state, target, amount, source, combat);
        }

        AbilityEffect::DelayedArea { radius, delay_ticks, reach } => {
            let facing = state.player.body.facing.sign();
            let point = state.player.body.center() + FixedVec2::new(facing * from_int(reach), 0);
            let radius = from_int(radius);
            state.add_effect(TransientEffect::area(point, radius, EffectTag::MeteorMarker, delay_ticks));
            schedule(state, delay_ticks, DeferredKind::DelayedArea {
                point,
                radius,
                damage: def.damage,
                slot,
            });
        }

        AbilityEffect::CorpseTrigger { radius } => {
            let radius = from_int(radius);
            for corpse in state.corpse_positions() {
                state.add_effect(TransientEffect::area(corpse, radius, EffectTag::CorpseBurst, BURST_TICKS));
                for id in actors_within(state, corpse, radius) {
                    let amount = ability_roll(def.damage, combat, rng);
                    apply_damage(state, id, amount, source, combat);
                }
            }
        }

        AbilityEffect::SelfBuffVisual { duration_ticks } => {
            let center = state.player.body.center();
            state.add_effect(TransientEffect::at(center, EffectTag::Aura, duration_ticks));
        }

        AbilityEffect::FullRoster => {
            let center = state.player.body.center();
            state.add_effect(TransientEffect::at(center, EffectTag::Annihilation, ANNIHILATION_TICKS));
            for id in state.alive_enemy_ids() {
                let health = state.enemy(id).map_or(0, |a| a.body.health);
                apply_damage(state, id, health, source, combat);
            }
        }
    }
}

/// Melee-equivalent ability hit: same reach and combo handling as the
/// basic swing, with the ability's damage, knockback and stun.
fn cast_melee<R: RandomSource>(
    state: &mut WorldState,
    damage: u32,
    slot: u8,
    knockback: Fixed,
    stun_ticks: u32,
    config: &SimConfig,
    rng: &mut R,
) {
    let combat = &config.combat;
    let facing = state.player.body.facing.sign();
    let center = state.player.body.center();
    let anchor = center + FixedVec2::new(facing * combat.player_melee_range / 2, 0);
    state.add_effect(TransientEffect::at(anchor, EffectTag::Slash, SLASH_TICKS));

    let targets: Vec<ActorId> = state
        .enemies
        .iter()
        .filter(|e| {
            e.alive
                && in_melee_reach(
                    &state.player.body,
                    &e.body,
                    combat.player_melee_range,
                    combat.player_melee_tolerance,
                )
        })
        .map(|e| e.id)
        .collect();

    if targets.is_empty() {
        let change = state.combo.break_combo(&config.combo);
        state.note_tier_change(change);
        return;
    }

    let multiplier = state.combo.multiplier;
    let world_width = state.world_width;
    for id in targets {
        let amount = scale_amount(ability_roll(damage, combat, rng), multiplier);
        let report = apply_damage(state, id, amount, DamageSource::Ability { slot }, combat);
        if report.killed {
            continue;
        }
        if let Some(actor) = state.enemy_mut(id) {
            let away = match (actor.body.center().x - center.x).signum() {
                0 => facing,
                s => s,
            };
            let max_x = (world_width - actor.body.size.x).max(0);
            actor.body.position.x = fixed_clamp(actor.body.position.x + away * knockback, 0, max_x);
            actor.apply_status(StatusKind::Stunned, stun_ticks);
        }
    }

    let change = state.combo.register_hit(&config.combo);
    state.note_tier_change(change);
}

/// Move the player next to `target`, on the side it is approaching from,
/// with bottoms aligned.
fn teleport_beside(state: &mut WorldState, target: ActorId) {
    let Some(actor) = state.enemy(target) else {
        return;
    };
    let target_center_x = actor.body.center().x;
    let target_bottom = actor.body.bottom();

    let world_width = state.world_width;
    let body = &mut state.player.body;
    let x = target_center_x - body.facing.sign() * TELEPORT_OFFSET - body.size.x / 2;
    let y = (target_bottom - body.size.y).max(0);
    let position = FixedVec2::new(fixed_clamp(x, 0, (world_width - body.size.x).max(0)), y);
    body.respawn(position);
}

fn ability_roll<R: RandomSource>(base: u32, combat: &CombatConfig, rng: &mut R) -> u32 {
    base.saturating_add(rng.roll(combat.ability_damage_bonus))
}

/// Point on the player's facing side, vertically centered.
fn leading_edge(player: &Player) -> FixedVec2 {
    let center = player.body.center();
    FixedVec2::new(center.x + player.body.facing.sign() * player.body.size.x / 2, center.y)
}

/// Living actors whose centers are strictly within `radius` of `point`.
fn actors_within(state: &WorldState, point: FixedVec2, radius: Fixed) -> Vec<ActorId> {
    state
        .enemies
        .iter()
        .filter(|e| e.alive && point.within_radius(e.body.center(), radius))
        .map(|e| e.id)
        .collect()
}

// =============================================================================
// DEFERRED ACTIONS
// =============================================================================

/// Work scheduled for a later tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredKind {
    /// Second half of a teleport strike
    TeleportFollowUp {
        target: ActorId,
        damage: u32,
        slot: u8,
    },
    /// Area hit at a point frozen at cast time
    DelayedArea {
        point: FixedVec2,
        radius: Fixed,
        damage: u32,
        slot: u8,
    },
    /// A staggered volley shot
    SpawnProjectile {
        position: FixedVec2,
        velocity: FixedVec2,
        damage: u32,
        lifetime: u32,
        slot: u8,
    },
}

/// A queued action and the tick it becomes due.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredAction {
    pub due_tick: u32,
    pub kind: DeferredKind,
}

fn schedule(state: &mut WorldState, delay_ticks: u32, kind: DeferredKind) {
    let due_tick = state.tick.saturating_add(delay_ticks);
    state.deferred.push(DeferredAction { due_tick, kind });
}

/// Resolve every action due at or before the current tick, in scheduling
/// order. Target sets are re-evaluated against living actors now.
pub fn process_deferred<R: RandomSource>(state: &mut WorldState, config: &SimConfig, rng: &mut R) {
    let tick = state.tick;
    let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut state.deferred)
        .into_iter()
        .partition(|a| a.due_tick <= tick);
    state.deferred = pending;

    let combat = &config.combat;
    for action in due {
        match action.kind {
            DeferredKind::TeleportFollowUp { target, damage, slot } => {
                let target = match state.enemy(target) {
                    Some(actor) if actor.alive => Some(target),
                    _ => state.first_alive_enemy(),
                };
                let Some(target) = target else {
                    continue;
                };
                let amount = scale_amount(ability_roll(damage, combat, rng), state.combo.multiplier);
                apply_damage(state, target, amount, DamageSource::Ability { slot }, combat);
                let change = state.combo.register_hit(&config.combo);
                state.note_tier_change(change);
            }

            DeferredKind::DelayedArea { point, radius, damage, slot } => {
                state.add_effect(TransientEffect::area(point, radius, EffectTag::MeteorImpact, BURST_TICKS));
                for id in actors_within(state, point, radius) {
                    let amount = ability_roll(damage, combat, rng);
                    apply_damage(state, id, amount, DamageSource::Ability { slot }, combat);
                }
            }

            DeferredKind::SpawnProjectile { position, velocity, damage, lifetime, slot } => {
                state.spawn_projectile(position, velocity, damage, lifetime, EffectTag::Barrage, slot);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::ConstantRoll;
    use crate::game::enemy::{EnemyKind, HostileActor};
    use crate::game::events::GameEventData;
    use crate::game::level::Level;

    /// Player at x=100 facing right on the ground; one Medium actor per x.
    fn arena(xs: &[i32]) -> (WorldState, AbilityCatalog) {
        let mut level = Level::demo();
        level.roster.clear();
        let mut state = WorldState::from_level(&level, 1);
        state.player.body.position = FixedVec2::from_ints(100, 440);
        state.enemies = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                HostileActor::new(ActorId(i as u32), EnemyKind::Medium, FixedVec2::from_ints(x, 444))
            })
            .collect();

        let catalog = AbilityCatalog::builtin();
        state.slots.populate(&catalog, &catalog.ids());
        (state, catalog)
    }

    fn slot_of(state: &WorldState, id: &str) -> usize {
        state
            .slots
            .iter()
            .position(|s| s.ability.as_ref().map(|a| a.as_str()) == Some(id))
            .expect("ability bound")
    }

    /// Bind a specific ability into slot 0.
    fn bind_first(state: &mut WorldState, catalog: &AbilityCatalog, id: &str) -> usize {
        state.slots.populate(catalog, &[AbilityId::new(id)]);
        0
    }

    #[test]
    fn test_populate_policy() {
        let (state, _) = arena(&[]);
        let bound: Vec<Option<&str>> = state
            .slots
            .iter()
            .map(|s| s.ability.as_ref().map(|a| a.as_str()))
            .collect();
        assert_eq!(
            bound,
            vec![
                Some("slash"),
                Some("arcane_bolt"),
                Some("barrage"),
                Some("shockwave"),
                Some("shadow_step"),
                Some("annihilation"),
            ]
        );
    }

    #[test]
    fn test_populate_without_capstone_leaves_reserved_empty() {
        let (mut state, catalog) = arena(&[]);
        state.slots.populate(&catalog, &[AbilityId::new("smite"), AbilityId::new("nope")]);
        assert_eq!(state.slots.get(0).unwrap().ability, Some(AbilityId::new("smite")));
        assert!(state.slots.get(1).unwrap().ability.is_none());
        assert!(state.slots.get(CAPSTONE_SLOT).unwrap().ability.is_none());
    }

    #[test]
    fn test_populate_keeps_remaining_cooldown() {
        let (mut state, catalog) = arena(&[]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "arcane_bolt");
        assert!(try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot).is_activated());

        state.slots.populate(&catalog, &[AbilityId::new("arcane_bolt")]);
        let rebound = state.slots.get(0).unwrap();
        assert_eq!(rebound.ability, Some(AbilityId::new("arcane_bolt")));
        assert_eq!(rebound.cooldown, 20);
    }

    #[test]
    fn test_rejections_leave_counters_unchanged() {
        let (mut state, catalog) = arena(&[140]);
        let config = SimConfig::default();

        let check = |state: &mut WorldState, slot: usize, reason: RejectReason| {
            let mana = state.player.mana;
            let slots = state.slots.clone();
            let hash = state.compute_hash();
            let outcome = try_activate(state, &catalog, &config, &mut ConstantRoll(0), slot);
            assert_eq!(outcome, ActivationOutcome::Rejected(reason));
            assert_eq!(state.player.mana, mana);
            assert_eq!(state.slots, slots);
            assert_eq!(state.compute_hash(), hash);
            assert!(state.take_events().is_empty());
        };

        check(&mut state, SLOT_COUNT, RejectReason::SlotOutOfRange);

        state.slots.populate(&catalog, &[AbilityId::new("arcane_bolt")]);
        check(&mut state, 1, RejectReason::EmptySlot);

        state.player.mana = 3;
        check(&mut state, 0, RejectReason::InsufficientMana);

        state.player.mana = 100;
        state.slots.slots[0].cooldown = 4;
        check(&mut state, 0, RejectReason::OnCooldown);

        state.slots.slots[0].ability = Some(AbilityId::new("gone"));
        state.slots.slots[0].cooldown = 0;
        check(&mut state, 0, RejectReason::UnknownAbility);

        state.slots.populate(&catalog, &[AbilityId::new("smite")]);
        state.enemies[0].alive = false;
        check(&mut state, 0, RejectReason::NoTarget);
    }

    #[test]
    fn test_targeted_cast_without_target_is_a_paid_no_op() {
        let (mut state, catalog) = arena(&[600]);
        let config = SimConfig::default();
        state.enemies[0].alive = false;
        let slot = slot_of(&state, "shadow_step");
        let before = state.player.body.position;

        let outcome = try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        assert!(outcome.is_activated());
        assert_eq!(state.player.mana, 100 - 18);
        assert_eq!(state.slots.get(slot).unwrap().cooldown, 150);
        assert_eq!(state.player.body.position, before);
        assert!(state.deferred.is_empty());
    }

    #[test]
    fn test_activation_spends_mana_and_starts_cooldown() {
        let (mut state, catalog) = arena(&[]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "arcane_bolt");

        assert!(try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot).is_activated());
        assert_eq!(state.player.mana, 100 - 8);
        assert_eq!(state.slots.get(slot).unwrap().cooldown, 20);

        let events = state.take_events();
        assert!(events.iter().any(|e| matches!(e.data, GameEventData::AbilityActivated { .. })));
        assert!(events.iter().any(|e| matches!(e.data, GameEventData::PlayerManaChanged { old: 100, new: 92 })));

        assert_eq!(
            try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot),
            ActivationOutcome::Rejected(RejectReason::OnCooldown)
        );
    }

    #[test]
    fn test_melee_ability_knockback_and_stun() {
        let (mut state, catalog) = arena(&[140]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "slash");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        let actor = &state.enemies[0];
        assert_eq!(actor.body.health, 100 - 25);
        assert_eq!(actor.body.position.x, from_int(180));
        assert!(actor.has_status(StatusKind::Stunned));
        assert_eq!(state.combo.hits, 1);
    }

    #[test]
    fn test_projectile_spawns_at_leading_edge() {
        let (mut state, catalog) = arena(&[]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "arcane_bolt");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(3), slot);
        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        // Player spans x 100..140, y 440..500
        assert_eq!(p.position, FixedVec2::from_ints(140, 470));
        assert_eq!(p.velocity, FixedVec2::from_ints(10, 0));
        assert_eq!(p.damage, 23);
        assert_eq!(p.lifetime, 60);
    }

    #[test]
    fn test_multi_projectile_split_and_stagger() {
        let (mut state, catalog) = arena(&[]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "barrage");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        // 36 / 3 each; first now, two staggered
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].damage, 12);
        assert_eq!(state.projectiles[0].velocity.y, from_int(-1));
        assert_eq!(state.deferred.len(), 2);

        state.tick += 4;
        process_deferred(&mut state, &config, &mut ConstantRoll(0));
        assert_eq!(state.projectiles.len(), 2);
        assert_eq!(state.projectiles[1].velocity.y, 0);

        state.tick += 4;
        process_deferred(&mut state, &config, &mut ConstantRoll(0));
        assert_eq!(state.projectiles.len(), 3);
        assert_eq!(state.projectiles[2].velocity.y, from_int(1));
        assert!(state.deferred.is_empty());
    }

    #[test]
    fn test_area_respects_radius() {
        // Player center x=120. Medium center = x + 22.
        // x=220 -> 122 away (inside 150); x=248 -> exactly 150 (outside).
        let (mut state, catalog) = arena(&[220, 248]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "shockwave");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(u32::MAX), slot);
        assert_eq!(state.enemies[0].body.health, 100 - 35);
        assert!(state.enemies[0].has_status(StatusKind::Slowed));
        assert_eq!(state.enemies[1].body.health, 100);
    }

    #[test]
    fn test_teleport_strike_relocates_then_hits() {
        let (mut state, catalog) = arena(&[600]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "shadow_step");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        // Target center 622, facing right: player center at 572
        assert_eq!(state.player.body.center().x, from_int(572));
        assert_eq!(state.player.body.bottom(), state.enemies[0].body.bottom());
        assert_eq!(state.enemies[0].body.health, 100);

        state.tick += 12;
        process_deferred(&mut state, &config, &mut ConstantRoll(0));
        assert_eq!(state.enemies[0].body.health, 100 - 35);
        assert_eq!(state.combo.hits, 1);
    }

    #[test]
    fn test_teleport_follow_up_retargets_when_target_died() {
        let (mut state, catalog) = arena(&[600, 900]);
        let config = SimConfig::default();
        let slot = slot_of(&state, "shadow_step");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        state.enemies[0].alive = false;
        state.tick += 12;
        process_deferred(&mut state, &config, &mut ConstantRoll(0));
        assert_eq!(state.enemies[1].body.health, 100 - 35);
    }

    #[test]
    fn test_instant_target_hits_lowest_index() {
        let (mut state, catalog) = arena(&[900, 300]);
        let config = SimConfig::default();
        let slot = bind_first(&mut state, &catalog, "smite");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        assert_eq!(state.enemies[0].body.health, 60);
        assert_eq!(state.enemies[1].body.health, 100);
    }

    #[test]
    fn test_delayed_area_point_frozen_at_cast() {
        // Point = player center 120 + 200 = 320
        let (mut state, catalog) = arena(&[290]);
        let config = SimConfig::default();
        let slot = bind_first(&mut state, &catalog, "meteor");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        assert_eq!(state.enemies[0].body.health, 100);

        // Player walks away; the impact point does not follow.
        state.player.body.position = FixedVec2::from_ints(1500, 440);
        state.tick += 45;
        process_deferred(&mut state, &config, &mut ConstantRoll(0));
        assert_eq!(state.enemies[0].body.health, 40);
    }

    #[test]
    fn test_corpse_trigger() {
        let (mut state, catalog) = arena(&[400, 450, 1200]);
        let config = SimConfig::default();
        let slot = bind_first(&mut state, &catalog, "corpse_burst");

        // No corpses yet: valid cast, nothing hit
        assert!(try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot).is_activated());
        assert!(state.enemies.iter().all(|e| e.body.health == 100));

        state.enemies[0].alive = false;
        state.slots.slots[slot].cooldown = 0;
        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        assert_eq!(state.enemies[1].body.health, 55);
        assert_eq!(state.enemies[2].body.health, 100);
    }

    #[test]
    fn test_full_roster_kills_each_once() {
        let (mut state, catalog) = arena(&[300, 500, 700]);
        let config = SimConfig::default();
        state.enemies[1].alive = false;
        let slot = slot_of(&state, "annihilation");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        assert!(state.enemies.iter().all(|e| !e.alive));

        let deaths: Vec<ActorId> = state
            .take_events()
            .into_iter()
            .filter_map(|e| match e.data {
                GameEventData::ActorDied { actor, .. } => Some(actor),
                _ => None,
            })
            .collect();
        assert_eq!(deaths, vec![ActorId(0), ActorId(2)]);
        assert_eq!(state.progression.kills, 2);
    }

    #[test]
    fn test_self_buff_is_visual_only() {
        let (mut state, catalog) = arena(&[140]);
        let config = SimConfig::default();
        let slot = bind_first(&mut state, &catalog, "battle_aura");

        try_activate(&mut state, &catalog, &config, &mut ConstantRoll(0), slot);
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].tag, EffectTag::Aura);
        assert_eq!(state.enemies[0].body.health, 100);
    }
}
