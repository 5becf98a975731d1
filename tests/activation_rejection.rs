#![allow(clippy::unwrap_used)]

mod common;

use rift_brawler::game::ability::{ActivationOutcome, RejectReason};
use rift_brawler::game::enemy::EnemyKind;
use rift_brawler::{InputFrame, Simulation};

use common::{grounded, sim_with};

fn counters(sim: &Simulation) -> (u32, Vec<u32>, [u8; 32]) {
    let state = sim.state();
    let cooldowns = state.slots.iter().map(|s| s.cooldown).collect();
    (state.player.mana, cooldowns, sim.compute_hash())
}

/// Two identical sessions; the caller drives one with slot presses and
/// the other idle, then compares counters.
fn twins(learned: &[&str], seed: u64) -> (Simulation, Simulation) {
    let roster = || vec![grounded(EnemyKind::Elite, 2000, None)];
    (sim_with(roster(), learned, seed), sim_with(roster(), learned, seed))
}

#[test]
fn empty_slot_is_rejected_without_mutation() {
    let (mut pressing, mut idle) = twins(&["arcane_bolt"], 41);

    let result = pressing.tick(InputFrame::new().slot(3));
    idle.tick(InputFrame::new());

    assert_eq!(result.activations, vec![(3, ActivationOutcome::Rejected(RejectReason::EmptySlot))]);
    assert_eq!(counters(&pressing), counters(&idle));
}

#[test]
fn cooldown_is_rejected_without_mutation() {
    let (mut pressing, mut idle) = twins(&["arcane_bolt"], 42);

    let first = pressing.tick(InputFrame::new().slot(0));
    idle.tick(InputFrame::new().slot(0));
    assert!(first.activations[0].1.is_activated());

    let second = pressing.tick(InputFrame::new().slot(0));
    idle.tick(InputFrame::new());

    assert_eq!(second.activations, vec![(0, ActivationOutcome::Rejected(RejectReason::OnCooldown))]);
    assert_eq!(counters(&pressing), counters(&idle));
}

#[test]
fn insufficient_mana_is_rejected_without_mutation() {
    let (mut pressing, mut idle) = twins(&["annihilation"], 43);
    pressing.state_mut().player.mana = 59;
    idle.state_mut().player.mana = 59;

    let result = pressing.tick(InputFrame::new().slot(5));
    idle.tick(InputFrame::new());

    assert_eq!(result.activations, vec![(5, ActivationOutcome::Rejected(RejectReason::InsufficientMana))]);
    assert_eq!(pressing.state().player.mana, 59);
    assert_eq!(counters(&pressing), counters(&idle));
}

#[test]
fn rejected_slot_input_leaves_the_tick_unchanged() {
    // One session presses an empty slot every tick, the other presses
    // nothing. Their hashes never diverge.
    let (mut pressing, mut idle) = twins(&["arcane_bolt"], 44);

    for _ in 0..30 {
        pressing.tick(InputFrame::new().slot(4));
        idle.tick(InputFrame::new());
        assert_eq!(pressing.compute_hash(), idle.compute_hash());
    }
}
