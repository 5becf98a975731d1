#![allow(dead_code)]

use rift_brawler::game::catalog::AbilityId;
use rift_brawler::game::enemy::EnemyKind;
use rift_brawler::game::level::RosterEntry;
use rift_brawler::{AbilityCatalog, Level, SimConfig, Simulation};

/// Ground top in the demo level.
pub const GROUND_TOP: i32 = 500;

/// Roster entry standing on the demo ground at `x`.
pub fn grounded(kind: EnemyKind, x: i32, max_health: Option<u32>) -> RosterEntry {
    let height = match kind {
        EnemyKind::Weak => 48,
        EnemyKind::Medium => 56,
        EnemyKind::Elite => 72,
    };
    RosterEntry { kind, x, y: GROUND_TOP - height, max_health }
}

/// Demo geometry with a custom roster and the given abilities learned.
pub fn sim_with(roster: Vec<RosterEntry>, learned: &[&str], seed: u64) -> Simulation {
    let mut level = Level::demo();
    level.roster = roster;
    let mut sim = Simulation::new(&level, AbilityCatalog::builtin(), SimConfig::default(), seed);
    let ids: Vec<AbilityId> = learned.iter().map(|id| AbilityId::new(id)).collect();
    sim.set_learned_abilities(&ids);
    sim
}
