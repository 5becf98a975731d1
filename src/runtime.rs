//! Real-Time Host
//!
//! Drives a [`Simulation`] at its configured tick rate on a tokio interval.
//! The host feeds commands over one channel and receives one
//! [`TickOutput`] per tick over another. Everything here is
//! non-deterministic plumbing; the simulation itself only sees the input
//! frame held when each tick fires.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::hash::StateHash;
use crate::core::rng::RandomSource;
use crate::game::catalog::AbilityId;
use crate::game::events::GameEvent;
use crate::game::input::InputFrame;
use crate::game::snapshot::WorldSnapshot;
use crate::game::state::{Outcome, Progression};
use crate::game::tick::Simulation;

/// Message from the host to a running session.
#[derive(Clone, Debug)]
pub enum HostCommand {
    /// Replace the held input; it applies to every tick until replaced
    Input(InputFrame),
    /// Rebind ability slots
    LearnedAbilities(Vec<AbilityId>),
    /// End the session without a terminal outcome
    Stop,
}

/// Per-tick output.
#[derive(Clone, Debug)]
pub struct TickOutput {
    /// Tick counter after the step
    pub tick: u32,
    /// State after the step
    pub snapshot: WorldSnapshot,
    /// Sorted events of the step
    pub events: Vec<GameEvent>,
}

/// Final totals of a session.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    /// `None` if the host stopped the session first
    pub outcome: Option<Outcome>,
    /// Ticks simulated
    pub ticks: u32,
    /// Score, experience and kills
    pub progression: Progression,
    /// Hash of the final state
    pub final_hash: StateHash,
}

/// Runtime host errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The host dropped the output receiver.
    #[error("output channel closed")]
    OutputClosed,
}

/// Run `sim` in real time until it ends, the host sends
/// [`HostCommand::Stop`], or the command channel closes.
pub async fn run_session<R: RandomSource>(
    mut sim: Simulation<R>,
    mut commands: mpsc::Receiver<HostCommand>,
    outputs: mpsc::Sender<TickOutput>,
) -> Result<SessionSummary, RuntimeError> {
    let tick_rate = sim.config().tick_rate.max(1);
    let tick_duration = Duration::from_micros(1_000_000 / tick_rate as u64);
    let mut tick_interval = interval(tick_duration);
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(tick_rate, "runtime session started");

    let mut held = InputFrame::new();
    'session: loop {
        tick_interval.tick().await;

        loop {
            match commands.try_recv() {
                Ok(HostCommand::Input(frame)) => held = frame,
                Ok(HostCommand::LearnedAbilities(ids)) => sim.set_learned_abilities(&ids),
                Ok(HostCommand::Stop) => {
                    info!(tick = sim.state().tick, "session stopped by host");
                    break 'session;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!(tick = sim.state().tick, "command channel closed");
                    break 'session;
                }
            }
        }

        let result = sim.tick(held);
        let output = TickOutput {
            tick: result.tick,
            snapshot: sim.snapshot(),
            events: result.events,
        };
        outputs.send(output).await.map_err(|_| RuntimeError::OutputClosed)?;

        if result.outcome.is_some() {
            break;
        }
    }

    let state = sim.state();
    Ok(SessionSummary {
        outcome: state.outcome(),
        ticks: state.tick,
        progression: state.progression,
        final_hash: sim.compute_hash(),
    })
}
