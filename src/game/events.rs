//! Game Events
//!
//! Discrete outputs of the simulation for the surrounding application:
//! deaths with score/experience payloads, vitals changes, combo tiers,
//! ability use and the terminal state.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::game::catalog::AbilityId;
use crate::game::enemy::{ActorId, EnemyKind};
use crate::game::state::Outcome;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Deaths processed first
    ActorDeath = 0,
    /// Then player health/mana
    PlayerVitals = 1,
    /// Then non-lethal damage
    Damage = 2,
    /// Then combo tier changes
    Combo = 3,
    /// Then ability use
    AbilityEffect = 4,
    /// Lowest priority
    Other = 255,
}

/// What dealt a point of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    /// Basic player swing
    PlayerMelee,
    /// Ability bound to a slot
    Ability { slot: u8 },
    /// A projectile (ability-spawned)
    Projectile { id: u32 },
    /// A hostile actor's strike
    Hostile { actor: ActorId },
    /// Falling out of the world
    Environment,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A hostile actor lost health
    ActorDamaged {
        actor: ActorId,
        amount: u32,
        remaining: u32,
        source: DamageSource,
    },

    /// A hostile actor died (exactly once per actor)
    ActorDied {
        actor: ActorId,
        kind: EnemyKind,
        score: u32,
        experience: u32,
        source: DamageSource,
    },

    /// Player health changed
    PlayerHealthChanged {
        old: u32,
        new: u32,
        cause: DamageSource,
    },

    /// Player mana changed (spend or regen)
    PlayerManaChanged {
        old: u32,
        new: u32,
    },

    /// Player fell out of the world and was put back
    PlayerRespawned {
        penalty: u32,
    },

    /// Combo moved between tiers
    ComboTierChanged {
        old_tier: u8,
        new_tier: u8,
        multiplier: Fixed,
        hits: u32,
    },

    /// An ability slot fired
    AbilityActivated {
        slot: u8,
        ability: AbilityId,
    },

    /// A projectile entered the world
    ProjectileSpawned {
        id: u32,
        position: FixedVec2,
    },

    /// Victory or defeat (exactly once per session)
    TerminalStateReached {
        outcome: Outcome,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Hostile actor involved (for tie-breaking)
    pub actor: Option<ActorId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        let actor = match &data {
            GameEventData::ActorDamaged { actor, .. } => Some(*actor),
            GameEventData::ActorDied { actor, .. } => Some(*actor),
            GameEventData::PlayerHealthChanged {
                cause: DamageSource::Hostile { actor },
                ..
            } => Some(*actor),
            _ => None,
        };

        Self {
            tick,
            priority,
            actor,
            data,
        }
    }

    /// Sort key: tick, then priority, then actor.
    pub fn sort_key(&self) -> (u32, EventPriority, Option<ActorId>) {
        (self.tick, self.priority, self.actor)
    }

    /// Create actor damaged event.
    pub fn actor_damaged(
        tick: u32,
        actor: ActorId,
        amount: u32,
        remaining: u32,
        source: DamageSource,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::Damage,
            GameEventData::ActorDamaged { actor, amount, remaining, source },
        )
    }

    /// Create actor died event.
    pub fn actor_died(
        tick: u32,
        actor: ActorId,
        kind: EnemyKind,
        score: u32,
        experience: u32,
        source: DamageSource,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::ActorDeath,
            GameEventData::ActorDied { actor, kind, score, experience, source },
        )
    }

    /// Create player health changed event.
    pub fn player_health_changed(tick: u32, old: u32, new: u32, cause: DamageSource) -> Self {
        Self::new(
            tick,
            EventPriority::PlayerVitals,
            GameEventData::PlayerHealthChanged { old, new, cause },
        )
    }

    /// Create player mana changed event.
    pub fn player_mana_changed(tick: u32, old: u32, new: u32) -> Self {
        Self::new(
            tick,
            EventPriority::PlayerVitals,
            GameEventData::PlayerManaChanged { old, new },
        )
    }

    pub fn player_respawned(tick: u32, penalty: u32) -> Self {
        Self::new(
            tick,
            EventPriority::PlayerVitals,
            GameEventData::PlayerRespawned { penalty },
        )
    }

    /// Create combo tier changed event.
    pub fn combo_tier_changed(
        tick: u32,
        old_tier: u8,
        new_tier: u8,
        multiplier: Fixed,
        hits: u32,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::Combo,
            GameEventData::ComboTierChanged { old_tier, new_tier, multiplier, hits },
        )
    }

    /// Create ability activated event.
    pub fn ability_activated(tick: u32, slot: u8, ability: AbilityId) -> Self {
        Self::new(
            tick,
            EventPriority::AbilityEffect,
            GameEventData::AbilityActivated { slot, ability },
        )
    }

    pub fn projectile_spawned(tick: u32, id: u32, position: FixedVec2) -> Self {
        Self::new(
            tick,
            EventPriority::AbilityEffect,
            GameEventData::ProjectileSpawned { id, position },
        )
    }

    /// Create terminal state event.
    pub fn terminal_state(tick: u32, outcome: Outcome) -> Self {
        Self::new(
            tick,
            EventPriority::Other,
            GameEventData::TerminalStateReached { outcome },
        )
    }
}

/// Stable sort by (tick, priority, actor); emission order breaks ties.
pub fn sort_events(events: &mut [GameEvent]) {
    events.sort_by_key(GameEvent::sort_key);
}
