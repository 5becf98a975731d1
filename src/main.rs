//! Rift Brawler headless demo
//!
//! Runs one session with a scripted player against a level, logs the
//! notable events, prints the final state hash and replays the recorded
//! inputs to verify determinism.
//!
//! Usage: `rift-brawler [level.json] [config.json]`

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rift_brawler::{
    TICK_RATE, VERSION,
    game::{
        events::GameEventData,
        input::{InputFrame, InputRecording},
        state::WorldState,
        tick::replay,
    },
    AbilityCatalog, Level, SimConfig, Simulation,
};

/// Demo session cap: two minutes of game time.
const MAX_TICKS: u32 = TICK_RATE * 120;

const SEED: u64 = 12345;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("Rift Brawler v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading level {}", path))?;
            Level::from_json_str(&text).with_context(|| format!("parsing level {}", path))?
        }
        None => Level::demo(),
    };
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading config {}", path))?;
            SimConfig::from_json_str(&text).with_context(|| format!("parsing config {}", path))?
        }
        None => SimConfig::default(),
    };

    demo_session(&level, config)
}

/// Walk toward the nearest living actor, swing when close, cycle abilities.
fn scripted_input(state: &WorldState) -> InputFrame {
    let player = state.player.body.center();
    let target = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .min_by_key(|e| (e.body.center().x - player.x).abs());

    let mut frame = InputFrame::new();
    if let Some(target) = target {
        let dx = target.body.center().x - player.x;
        if dx.abs() < rift_brawler::core::fixed::from_int(50) {
            frame = frame.attack();
        } else if dx > 0 {
            frame = frame.right();
        } else {
            frame = frame.left();
        }
    }
    if state.tick % 45 == 0 {
        frame = frame.slot(((state.tick / 45) % 6) as usize);
    }
    frame
}

fn demo_session(level: &Level, config: SimConfig) -> Result<()> {
    info!("=== Starting Demo Session: {} ===", level.name);
    info!("RNG Seed: {}", SEED);

    let catalog = AbilityCatalog::builtin();
    let learned = catalog.ids();
    let mut sim = Simulation::new(level, catalog.clone(), config.clone(), SEED);
    sim.set_learned_abilities(&learned);

    let mut total_events = 0;
    for _ in 0..MAX_TICKS {
        let input = scripted_input(sim.state());
        let result = sim.tick(input);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::ActorDied { actor, kind, score, .. } => {
                    info!("Tick {}: {} ({:?}) died, +{} score", event.tick, actor, kind, score);
                }
                GameEventData::ComboTierChanged { new_tier, hits, .. } => {
                    info!("Tick {}: combo tier {} at {} hits", event.tick, new_tier, hits);
                }
                GameEventData::PlayerRespawned { penalty } => {
                    info!("Tick {}: player fell out (-{})", event.tick, penalty);
                }
                GameEventData::TerminalStateReached { outcome } => {
                    info!("Tick {}: session ended: {:?}", event.tick, outcome);
                }
                _ => {}
            }
        }

        if result.outcome.is_some() {
            break;
        }
    }

    info!("=== Session Results ===");
    let state = sim.state();
    let hash = sim.compute_hash();
    info!("Ticks: {}", state.tick);
    info!("Outcome: {:?}", state.outcome());
    info!(
        "Score: {} | Experience: {} | Kills: {}",
        state.progression.score, state.progression.experience, state.progression.kills
    );
    info!("Total events: {}", total_events);
    info!("Final State Hash: {}", hex::encode(hash));

    let snapshot = sim.snapshot().to_json().context("rendering final snapshot")?;
    info!("Final snapshot: {} bytes of JSON", snapshot.len());

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let bytes = sim.recording().to_bytes().context("encoding recording")?;
    let recording = InputRecording::from_bytes(&bytes).context("decoding recording")?;
    info!(
        "Recording: {} deltas, {} rebindings, {} bytes",
        recording.deltas().len(),
        recording.bindings().len(),
        bytes.len()
    );

    let fresh = Simulation::new(level, catalog, config, recording.rng_seed);
    let (replayed, _) = replay(fresh, &recording, state.tick);
    let replay_hash = replayed.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("determinism failure: replay hash differs");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
