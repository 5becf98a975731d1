#![allow(clippy::unwrap_used)]

use rift_brawler::game::tick::replay;
use rift_brawler::{AbilityCatalog, InputFrame, InputRecording, Level, SimConfig, Simulation};

fn demo_sim(seed: u64) -> Simulation {
    let catalog = AbilityCatalog::builtin();
    let learned = catalog.ids();
    let mut sim = Simulation::new(&Level::demo(), catalog, SimConfig::default(), seed);
    sim.set_learned_abilities(&learned);
    sim
}

/// Walk right, jump now and then, swing and fire slots on a cycle.
fn script(t: u32) -> InputFrame {
    let mut frame = match (t / 40) % 4 {
        0 | 1 => InputFrame::new().right(),
        2 => InputFrame::new().attack(),
        _ => InputFrame::new().left(),
    };
    if t % 50 == 25 {
        frame = frame.jump();
    }
    if t % 30 == 0 {
        frame = frame.slot(((t / 30) % 6) as usize);
    }
    frame
}

#[test]
fn replay_from_encoded_recording_matches_live_hash() {
    let mut live = demo_sim(2024);
    for t in 0..900 {
        if live.tick(script(t)).outcome.is_some() {
            break;
        }
    }

    let bytes = live.recording().to_bytes().unwrap();
    let recording = InputRecording::from_bytes(&bytes).unwrap();
    assert_eq!(recording.rng_seed, 2024);
    assert!(recording.deltas().len() < live.state().tick as usize);

    let (replayed, _) = replay(demo_sim(recording.rng_seed), &recording, live.state().tick);
    assert_eq!(replayed.state().tick, live.state().tick);
    assert_eq!(replayed.compute_hash(), live.compute_hash());
    assert_eq!(replayed.state().progression, live.state().progression);
}

#[test]
fn replay_restores_bindings_from_the_recording() {
    let catalog = AbilityCatalog::builtin();
    let fresh = || Simulation::new(&Level::demo(), AbilityCatalog::builtin(), SimConfig::default(), 55);

    let mut live = fresh();
    for t in 0..5 {
        live.tick(script(t));
    }
    live.set_learned_abilities(&catalog.ids());
    for t in 5..240 {
        if live.tick(script(t)).outcome.is_some() {
            break;
        }
    }
    assert!(live.state().slots.iter().all(|s| s.ability.is_some()));

    // The replaying session starts with nothing learned.
    let (replayed, _) = replay(fresh(), live.recording(), live.state().tick);
    assert_eq!(replayed.state().slots, live.state().slots);
    assert_eq!(replayed.compute_hash(), live.compute_hash());
}

#[test]
fn changed_input_changes_hash() {
    let mut a = demo_sim(7);
    let mut b = demo_sim(7);
    for t in 0..120 {
        a.tick(script(t));
        b.tick(if t == 10 { InputFrame::new().jump() } else { script(t) });
    }
    assert_ne!(a.compute_hash(), b.compute_hash());
}
