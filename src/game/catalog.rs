//! Ability Catalog
//!
//! Declarative ability definitions, read-only to the simulation. Each
//! definition maps an identifier to costs and exactly one effect variant
//! carrying only the parameters that effect needs.
//!
//! Distances and speeds in definitions are whole pixels (per tick for
//! speeds) so catalogs stay readable as JSON.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::error::DataError;

/// Catalog key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub String);

impl AbilityId {
    /// Create from a string slice.
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an ability turns into world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Player melee using the ability's damage, with optional knockback/stun.
    Melee {
        #[serde(default)]
        knockback: i32,
        #[serde(default)]
        stun_ticks: u32,
    },

    /// One projectile from the leading edge along the facing.
    Projectile {
        speed: i32,
        lifetime_ticks: u32,
    },

    /// A volley; damage split evenly, each shot offset vertically and in time.
    MultiProjectile {
        count: u32,
        speed: i32,
        lifetime_ticks: u32,
        /// Vertical speed step between adjacent shots
        #[serde(default)]
        spread: i32,
        /// Ticks between consecutive shots
        #[serde(default)]
        stagger_ticks: u32,
    },

    /// Everything alive within `radius` of the player center.
    Area {
        radius: i32,
        #[serde(default)]
        slow_ticks: u32,
    },

    /// Blink next to the first living target, strike after a delay.
    TeleportStrike {
        delay_ticks: u32,
    },

    /// Immediate hit on the first living target.
    InstantTarget,

    /// Area hit at a point `reach` ahead of the player, resolved later.
    DelayedArea {
        radius: i32,
        delay_ticks: u32,
        reach: i32,
    },

    /// Area hit around every corpse.
    CorpseTrigger {
        radius: i32,
    },

    /// Cosmetic aura only.
    SelfBuffVisual {
        duration_ticks: u32,
    },

    /// Kill every living hostile actor.
    FullRoster,
}

impl AbilityEffect {
    /// Short name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AbilityEffect::Melee { .. } => "melee",
            AbilityEffect::Projectile { .. } => "projectile",
            AbilityEffect::MultiProjectile { .. } => "multi_projectile",
            AbilityEffect::Area { .. } => "area",
            AbilityEffect::TeleportStrike { .. } => "teleport_strike",
            AbilityEffect::InstantTarget => "instant_target",
            AbilityEffect::DelayedArea { .. } => "delayed_area",
            AbilityEffect::CorpseTrigger { .. } => "corpse_trigger",
            AbilityEffect::SelfBuffVisual { .. } => "self_buff_visual",
            AbilityEffect::FullRoster => "full_roster",
        }
    }

    /// Cannot be cast without a living hostile actor. Teleport strike is
    /// not included: its relocation is a no-op when nobody is alive.
    pub fn requires_target(&self) -> bool {
        matches!(self, AbilityEffect::InstantTarget)
    }
}

/// One catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    /// Display name
    pub name: String,
    /// Base damage before the random bonus
    pub damage: u32,
    pub mana_cost: u32,
    pub cooldown_ticks: u32,
    /// Eligible only for the reserved slot
    #[serde(default)]
    pub capstone: bool,
    pub effect: AbilityEffect,
}

#[derive(Deserialize)]
struct CatalogDocument {
    abilities: Vec<AbilityDefinition>,
}

// =============================================================================
// CATALOG
// =============================================================================

/// Ordered set of definitions with lookup by id.
#[derive(Clone, Debug, Default)]
pub struct AbilityCatalog {
    abilities: Vec<AbilityDefinition>,
    index: BTreeMap<AbilityId, usize>,
}

impl AbilityCatalog {
    /// Build from definitions, keeping their order. Duplicate ids fail.
    pub fn from_definitions(abilities: Vec<AbilityDefinition>) -> Result<Self, DataError> {
        let mut index = BTreeMap::new();
        for (i, def) in abilities.iter().enumerate() {
            if index.insert(def.id.clone(), i).is_some() {
                return Err(DataError::DuplicateAbility(def.id.0.clone()));
            }
        }
        Ok(Self { abilities, index })
    }

    /// Parse `{ "abilities": [...] }`.
    pub fn from_json_str(s: &str) -> Result<Self, DataError> {
        let doc: CatalogDocument = serde_json::from_str(s)?;
        Self::from_definitions(doc.abilities)
    }

    /// Resolve an id.
    pub fn get(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.index.get(id).map(|&i| &self.abilities[i])
    }

    /// Definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.iter()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// All ids in catalog order.
    pub fn ids(&self) -> Vec<AbilityId> {
        self.abilities.iter().map(|a| a.id.clone()).collect()
    }

    /// Built-in catalog: one ability per effect kind plus a capstone.
    pub fn builtin() -> Self {
        let defs = vec![
            def("slash", "Rending Slash", 25, 10, 30, false,
                AbilityEffect::Melee { knockback: 40, stun_ticks: 30 }),
            def("arcane_bolt", "Arcane Bolt", 20, 8, 20, false,
                AbilityEffect::Projectile { speed: 10, lifetime_ticks: 60 }),
            def("barrage", "Barrage", 36, 15, 90, false,
                AbilityEffect::MultiProjectile {
                    count: 3, speed: 9, lifetime_ticks: 50, spread: 1, stagger_ticks: 4,
                }),
            def("shockwave", "Shockwave", 30, 20, 120, false,
                AbilityEffect::Area { radius: 150, slow_ticks: 90 }),
            def("shadow_step", "Shadow Step", 35, 18, 150, false,
                AbilityEffect::TeleportStrike { delay_ticks: 12 }),
            def("smite", "Smite", 40, 25, 180, false,
                AbilityEffect::InstantTarget),
            def("meteor", "Meteor", 60, 30, 240, false,
                AbilityEffect::DelayedArea { radius: 120, delay_ticks: 45, reach: 200 }),
            def("corpse_burst", "Corpse Burst", 45, 20, 150, false,
                AbilityEffect::CorpseTrigger { radius: 100 }),
            def("battle_aura", "Battle Aura", 0, 5, 300, false,
                AbilityEffect::SelfBuffVisual { duration_ticks: 120 }),
            def("annihilation", "Annihilation", 0, 60, 1200, true,
                AbilityEffect::FullRoster),
        ];

        // Built-in ids are unique.
        let index = defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        Self { abilities: defs, index }
    }
}

fn def(
    id: &str,
    name: &str,
    damage: u32,
    mana_cost: u32,
    cooldown_ticks: u32,
    capstone: bool,
    effect: AbilityEffect,
) -> AbilityDefinition {
    AbilityDefinition {
        id: AbilityId::new(id),
        name: name.to_owned(),
        damage,
        mana_cost,
        cooldown_ticks,
        capstone,
        effect,
    }
}

// =============================================================================
// TESTS
// =============================================================================
