//! World State Definitions
//!
//! Everything one simulation session owns: the player, the hostile roster,
//! projectiles, transient effects, combo, ability slots and the deferred
//! action queue. The tick loop is the only writer.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, from_int};
use crate::core::vec2::FixedVec2;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::game::ability::{AbilitySlots, DeferredAction, DeferredKind};
use crate::game::body::Body;
use crate::game::collision::Platform;
use crate::game::combo::{ComboTracker, TierChange};
use crate::game::enemy::{ActorId, HostileActor};
use crate::game::events::GameEvent;
use crate::game::input::InputFrame;
use crate::game::level::Level;
use crate::game::projectile::{EffectTag, Projectile, TransientEffect};

/// Player body extent in pixels.
pub const PLAYER_SIZE: (i32, i32) = (40, 60);

// =============================================================================
// PLAYER
// =============================================================================

/// The controllable actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Physical state and health
    pub body: Body,

    /// Current mana
    pub mana: u32,

    /// Maximum mana
    pub max_mana: u32,

    /// Ticks until the basic swing is ready again
    pub melee_cooldown: u32,

    /// Fall-out recovery point
    pub spawn_point: FixedVec2,
}

impl Player {
    /// Create a player at full health and mana.
    pub fn new(spawn_point: FixedVec2, max_health: u32, max_mana: u32) -> Self {
        let size = FixedVec2::from_ints(PLAYER_SIZE.0, PLAYER_SIZE.1);
        Self {
            body: Body::new(spawn_point, size, max_health),
            mana: max_mana,
            max_mana,
            melee_cooldown: 0,
            spawn_point,
        }
    }

    /// Add mana up to the cap. Returns the new value.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
        self.mana
    }

    /// Whether the player can no longer fight.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.body.health == 0
    }
}

// =============================================================================
// SESSION PHASE
// =============================================================================

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Outcome {
    /// No hostile actor remains alive
    Victory = 0,
    /// Player health reached zero
    Defeat = 1,
}

/// Current phase of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Ticks advance normally
    #[default]
    Playing,
    /// Terminal state reached; ticks are no-ops
    Ended(Outcome),
}

/// Score, experience and kill totals for the host's progression system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u32,
    pub experience: u32,
    pub kills: u32,
}

impl Progression {
    /// Record one death payload.
    pub fn record_kill(&mut self, score: u32, experience: u32) {
        self.score = self.score.saturating_add(score);
        self.experience = self.experience.saturating_add(experience);
        self.kills = self.kills.saturating_add(1);
    }
}

// =============================================================================
// WORLD STATE
// =============================================================================

/// Complete state of a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldState {
    /// Ticks completed
    pub tick: u32,

    /// Current phase
    pub phase: SimPhase,

    /// RNG seed (for verification)
    pub rng_seed: u64,

    /// Right edge of the world; the left edge is 0
    pub world_width: Fixed,

    /// Bodies below this y have fallen out
    pub fall_limit: Fixed,

    /// Static geometry, resolved in list order
    pub platforms: Vec<Platform>,

    /// The controllable actor
    pub player: Player,

    /// Hostile roster; index is the actor id, dead actors stay
    pub enemies: Vec<HostileActor>,

    /// Live projectiles
    pub projectiles: Vec<Projectile>,

    /// Live presentation effects
    pub effects: Vec<TransientEffect>,

    /// Hit streak
    pub combo: ComboTracker,

    /// Bound abilities and their cooldowns
    pub slots: AbilitySlots,

    /// Actions waiting for their due tick, in scheduling order
    pub deferred: Vec<DeferredAction>,

    /// Accumulated death payloads
    pub progression: Progression,

    /// Next projectile ID (monotonic counter)
    pub next_projectile_id: u32,

    /// Input applied on the latest tick
    pub input: InputFrame,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl WorldState {
    /// Build the initial state of a level.
    pub fn from_level(level: &Level, rng_seed: u64) -> Self {
        let enemies = level
            .roster
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.spawn(ActorId(i as u32)))
            .collect();

        Self {
            tick: 0,
            phase: SimPhase::Playing,
            rng_seed,
            world_width: from_int(level.world_width),
            fall_limit: from_int(level.fall_limit),
            platforms: level.platforms(),
            player: Player::new(level.spawn_point(), level.player_max_health, level.player_max_mana),
            enemies,
            projectiles: Vec::new(),
            effects: Vec::new(),
            combo: ComboTracker::default(),
            slots: AbilitySlots::default(),
            deferred: Vec::new(),
            progression: Progression::default(),
            next_projectile_id: 0,
            input: InputFrame::new(),
            pending_events: Vec::new(),
        }
    }

    /// Check if the session has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, SimPhase::Ended(_))
    }

    /// Terminal outcome, if reached.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            SimPhase::Ended(outcome) => Some(outcome),
            SimPhase::Playing => None,
        }
    }

    /// Get a hostile actor by id.
    pub fn enemy(&self, id: ActorId) -> Option<&HostileActor> {
        self.enemies.get(id.index())
    }

    /// Get a hostile actor mutably by id.
    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut HostileActor> {
        self.enemies.get_mut(id.index())
    }

    /// Lowest-index living hostile actor.
    pub fn first_alive_enemy(&self) -> Option<ActorId> {
        self.enemies.iter().find(|e| e.alive).map(|e| e.id)
    }

    /// Ids of every living hostile actor, in roster order.
    pub fn alive_enemy_ids(&self) -> Vec<ActorId> {
        self.enemies.iter().filter(|e| e.alive).map(|e| e.id).collect()
    }

    /// Number of living hostile actors.
    pub fn alive_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Centers of every dead hostile actor, in roster order.
    pub fn corpse_positions(&self) -> Vec<FixedVec2> {
        self.enemies
            .iter()
            .filter(|e| !e.alive)
            .map(|e| e.body.center())
            .collect()
    }

    /// Add a projectile and announce it. Returns its id.
    pub fn spawn_projectile(
        &mut self,
        position: FixedVec2,
        velocity: FixedVec2,
        damage: u32,
        lifetime: u32,
        tag: EffectTag,
        source_slot: u8,
    ) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            position,
            velocity,
            damage,
            lifetime,
            tag,
            source_slot,
        });
        self.push_event(GameEvent::projectile_spawned(self.tick, id, position));
        id
    }

    /// Add a presentation effect.
    pub fn add_effect(&mut self, effect: TransientEffect) {
        if effect.remaining > 0 {
            self.effects.push(effect);
        }
    }

    /// Emit an event for a combo tier transition, if any.
    pub fn note_tier_change(&mut self, change: Option<TierChange>) {
        if let Some(c) = change {
            self.push_event(GameEvent::combo_tier_changed(
                self.tick,
                c.old_tier,
                c.new_tier,
                c.multiplier,
                c.hits,
            ));
        }
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            match self.phase {
                SimPhase::Playing => hasher.update_u8(0),
                SimPhase::Ended(outcome) => {
                    hasher.update_u8(1);
                    hasher.update_u8(outcome as u8);
                }
            }

            hash_body(hasher, &self.player.body);
            hasher.update_u32(self.player.mana);
            hasher.update_u32(self.player.melee_cooldown);

            hasher.update_u32(self.enemies.len() as u32);
            for enemy in &self.enemies {
                hasher.update_u32(enemy.id.0);
                hasher.update_u8(enemy.kind as u8);
                hash_body(hasher, &enemy.body);
                hasher.update_bool(enemy.alive);
                hasher.update_u32(enemy.attack_cooldown);
                hasher.update_u32(enemy.statuses.len() as u32);
                for status in &enemy.statuses {
                    hasher.update_u8(status.kind as u8);
                    hasher.update_u32(status.remaining_ticks);
                }
            }

            hasher.update_u32(self.projectiles.len() as u32);
            for projectile in &self.projectiles {
                hasher.update_u32(projectile.id);
                hasher.update_vec2(projectile.position);
                hasher.update_vec2(projectile.velocity);
                hasher.update_u32(projectile.damage);
                hasher.update_u32(projectile.lifetime);
            }

            hasher.update_u32(self.effects.len() as u32);
            for effect in &self.effects {
                hasher.update_u8(effect.tag as u8);
                hasher.update_u32(effect.remaining);
            }

            hasher.update_u32(self.combo.hits);
            hasher.update_u32(self.combo.decay_remaining);

            for slot in self.slots.iter() {
                hasher.update_str(slot.ability.as_ref().map_or("", |a| a.as_str()));
                hasher.update_u32(slot.cooldown);
            }

            hasher.update_u32(self.deferred.len() as u32);
            for action in &self.deferred {
                hash_deferred(hasher, action);
            }

            hasher.update_u32(self.progression.score);
            hasher.update_u32(self.progression.experience);
            hasher.update_u32(self.progression.kills);
            hasher.update_u32(self.next_projectile_id);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

fn hash_deferred(hasher: &mut StateHasher, action: &DeferredAction) {
    hasher.update_u32(action.due_tick);
    match &action.kind {
        DeferredKind::TeleportFollowUp { target, damage, slot } => {
            hasher.update_u8(0);
            hasher.update_u32(target.0);
            hasher.update_u32(*damage);
            hasher.update_u8(*slot);
        }
        DeferredKind::DelayedArea { point, radius, damage, slot } => {
            hasher.update_u8(1);
            hasher.update_vec2(*point);
            hasher.update_fixed(*radius);
            hasher.update_u32(*damage);
            hasher.update_u8(*slot);
        }
        DeferredKind::SpawnProjectile { position, velocity, damage, lifetime, slot } => {
            hasher.update_u8(2);
            hasher.update_vec2(*position);
            hasher.update_vec2(*velocity);
            hasher.update_u32(*damage);
            hasher.update_u32(*lifetime);
            hasher.update_u8(*slot);
        }
    }
}

fn hash_body(hasher: &mut StateHasher, body: &Body) {
    hasher.update_vec2(body.position);
    hasher.update_vec2(body.velocity);
    hasher.update_bool(body.on_ground);
    hasher.update_u8(body.facing as u8);
    hasher.update_u32(body.health);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::EnemyKind;

    #[test]
    fn test_from_demo_level() {
        let level = Level::demo();
        let state = WorldState::from_level(&level, 42);

        assert_eq!(state.enemies.len(), level.roster.len());
        for (i, enemy) in state.enemies.iter().enumerate() {
            assert_eq!(enemy.id, ActorId(i as u32));
            assert!(enemy.alive);
        }
        assert_eq!(state.player.mana, state.player.max_mana);
        assert_eq!(state.phase, SimPhase::Playing);
    }

    #[test]
    fn test_first_alive_is_lowest_index() {
        let mut state = WorldState::from_level(&Level::demo(), 1);
        assert_eq!(state.first_alive_enemy(), Some(ActorId(0)));

        state.enemies[0].alive = false;
        assert_eq!(state.first_alive_enemy(), Some(ActorId(1)));
        assert_eq!(state.corpse_positions().len(), 1);

        for enemy in &mut state.enemies {
            enemy.alive = false;
        }
        assert_eq!(state.first_alive_enemy(), None);
        assert_eq!(state.alive_enemy_count(), 0);
    }

    #[test]
    fn test_spawn_projectile_ids_and_event() {
        let mut state = WorldState::from_level(&Level::demo(), 1);
        let a = state.spawn_projectile(FixedVec2::ZERO, FixedVec2::ZERO, 5, 10, EffectTag::Bolt, 1);
        let b = state.spawn_projectile(FixedVec2::ZERO, FixedVec2::ZERO, 5, 10, EffectTag::Bolt, 1);
        assert_eq!((a, b), (0, 1));
        assert_eq!(state.projectiles.len(), 2);
        assert_eq!(state.take_events().len(), 2);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_hash_tracks_state() {
        let level = Level::demo();
        let a = WorldState::from_level(&level, 7);
        let mut b = WorldState::from_level(&level, 7);
        assert_eq!(a.compute_hash(), b.compute_hash());

        b.enemies[0].body.take_damage(1);
        assert_ne!(a.compute_hash(), b.compute_hash());

        let c = WorldState::from_level(&level, 8);
        assert_ne!(a.compute_hash(), c.compute_hash());
    }

    #[test]
    fn test_hash_covers_deferred_payload() {
        let level = Level::demo();
        let follow_up = |damage| DeferredAction {
            due_tick: 20,
            kind: DeferredKind::TeleportFollowUp { target: ActorId(0), damage, slot: 4 },
        };

        let mut a = WorldState::from_level(&level, 7);
        let mut b = WorldState::from_level(&level, 7);
        a.deferred.push(follow_up(35));
        b.deferred.push(follow_up(35));
        assert_eq!(a.compute_hash(), b.compute_hash());

        b.deferred[0] = follow_up(36);
        assert_ne!(a.compute_hash(), b.compute_hash());

        b.deferred[0] = DeferredAction {
            due_tick: 20,
            kind: DeferredKind::DelayedArea {
                point: FixedVec2::from_ints(300, 450),
                radius: from_int(120),
                damage: 35,
                slot: 4,
            },
        };
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_progression_totals() {
        let mut progression = Progression::default();
        progression.record_kill(EnemyKind::Medium.max_health() * 10, 50);
        progression.record_kill(500, 25);
        assert_eq!(progression.score, 1500);
        assert_eq!(progression.experience, 75);
        assert_eq!(progression.kills, 2);
    }

    #[test]
    fn test_restore_mana_caps() {
        let mut player = Player::new(FixedVec2::ZERO, 100, 50);
        player.mana = 45;
        assert_eq!(player.restore_mana(10), 50);
    }
}
