#![allow(clippy::unwrap_used)]

use tokio::sync::mpsc;

use rift_brawler::game::events::GameEventData;
use rift_brawler::game::state::Outcome;
use rift_brawler::runtime::{run_session, HostCommand, RuntimeError};
use rift_brawler::{AbilityCatalog, InputFrame, Level, SimConfig, Simulation};

fn sim(level: &Level) -> Simulation {
    Simulation::new(level, AbilityCatalog::builtin(), SimConfig::default(), 99)
}

#[tokio::test]
async fn empty_roster_ends_in_victory_on_first_tick() {
    let mut level = Level::demo();
    level.roster.clear();

    let (_cmd_tx, cmd_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(8);

    let summary = run_session(sim(&level), cmd_rx, out_tx).await.unwrap();
    assert_eq!(summary.outcome, Some(Outcome::Victory));
    assert_eq!(summary.ticks, 1);

    let output = out_rx.recv().await.unwrap();
    assert_eq!(output.tick, 1);
    assert!(output
        .events
        .iter()
        .any(|e| e.data == GameEventData::TerminalStateReached { outcome: Outcome::Victory }));
    assert!(out_rx.recv().await.is_none());
}

#[tokio::test]
async fn stop_command_ends_session_without_outcome() {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(64);

    let host = tokio::spawn(run_session(sim(&Level::demo()), cmd_rx, out_tx));

    cmd_tx.send(HostCommand::Input(InputFrame::new().right())).await.unwrap();
    for _ in 0..3 {
        let output = out_rx.recv().await.unwrap();
        assert!(output.snapshot.enemies.iter().all(|e| e.alive));
    }
    cmd_tx.send(HostCommand::Stop).await.unwrap();

    let summary = host.await.unwrap().unwrap();
    assert_eq!(summary.outcome, None);
    assert!(summary.ticks >= 3);
}

#[tokio::test]
async fn learned_abilities_rebind_slots() {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(64);

    let host = tokio::spawn(run_session(sim(&Level::demo()), cmd_rx, out_tx));
    cmd_tx
        .send(HostCommand::LearnedAbilities(AbilityCatalog::builtin().ids()))
        .await
        .unwrap();

    // The command lands before whichever tick first drains it.
    let mut bound = None;
    for _ in 0..10 {
        let output = out_rx.recv().await.unwrap();
        if output.snapshot.slots[0].ability.is_some() {
            bound = Some(output);
            break;
        }
    }
    let output = bound.unwrap();
    assert_eq!(output.snapshot.slots[0].ability.as_deref(), Some("slash"));
    assert_eq!(output.snapshot.slots[5].ability.as_deref(), Some("annihilation"));

    drop(cmd_tx);
    let summary = host.await.unwrap().unwrap();
    assert_eq!(summary.outcome, None);
}

#[tokio::test]
async fn dropped_output_receiver_is_an_error() {
    let (_cmd_tx, cmd_rx) = mpsc::channel(8);
    let (out_tx, out_rx) = mpsc::channel(8);
    drop(out_rx);

    let result = run_session(sim(&Level::demo()), cmd_rx, out_tx).await;
    assert!(matches!(result, Err(RuntimeError::OutputClosed)));
}
