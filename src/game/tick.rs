//! Fixed-Timestep Simulation Tick
//!
//! One call to [`tick`] advances the world by exactly one step. Stage order
//! is fixed so a seed plus an input recording always reproduces the same
//! state hash.

use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHash;
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::error::DataError;
use crate::game::ability::{process_deferred, try_activate, AbilityConfig, ActivationOutcome};
use crate::game::body::{integrate, steer, try_jump, PhysicsConfig};
use crate::game::catalog::{AbilityCatalog, AbilityId};
use crate::game::collision::resolve_platforms;
use crate::game::combat::{
    apply_damage, damage_player, resolve_hostile_melee, resolve_player_melee, CombatConfig,
};
use crate::game::combo::ComboConfig;
use crate::game::enemy::{advance_actor, EnemyConfig, Terrain};
use crate::game::events::{sort_events, DamageSource, GameEvent};
use crate::game::input::{InputFrame, InputRecording};
use crate::game::level::Level;
use crate::game::projectile::{advance_projectiles, age_effects};
use crate::game::snapshot::WorldSnapshot;
use crate::game::state::{Outcome, SimPhase, WorldState};

// =============================================================================
// CONFIG
// =============================================================================

/// Every tuning constant of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks per second
    pub tick_rate: u32,
    /// Upper bound on ticks run for one long frame
    pub max_catch_up_ticks: u32,
    pub physics: PhysicsConfig,
    pub combat: CombatConfig,
    pub enemy: EnemyConfig,
    pub combo: ComboConfig,
    pub abilities: AbilityConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: crate::TICK_RATE,
            max_catch_up_ticks: 5,
            physics: PhysicsConfig::default(),
            combat: CombatConfig::default(),
            enemy: EnemyConfig::default(),
            combo: ComboConfig::default(),
            abilities: AbilityConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON override. Missing fields keep
    /// their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, DataError> {
        let config: SimConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the tick cannot run with.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.tick_rate == 0 {
            return Err(DataError::InvalidConfig("tick_rate must be positive".into()));
        }
        if self.max_catch_up_ticks == 0 {
            return Err(DataError::InvalidConfig("max_catch_up_ticks must be positive".into()));
        }
        if self.abilities.mana_regen_interval == 0 {
            return Err(DataError::InvalidConfig("mana_regen_interval must be positive".into()));
        }
        if self.combat.experience_divisor == 0 {
            return Err(DataError::InvalidConfig("experience_divisor must be positive".into()));
        }
        self.combo.validate()
    }
}

// =============================================================================
// TICK
// =============================================================================

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Tick counter after this step
    pub tick: u32,
    /// Events generated this tick, sorted
    pub events: Vec<GameEvent>,
    /// Outcome of each requested slot, in ascending slot order
    pub activations: Vec<(usize, ActivationOutcome)>,
    /// Set once the session has ended
    pub outcome: Option<Outcome>,
}

/// Run one simulation tick.
///
/// Stages, in order:
/// 1. player movement, jump, integration, fall-out, platforms
/// 2. hostile actors (alive only)
/// 3. player melee, then hostile strikes
/// 4. slot cooldowns, due deferred actions, requested slots (ascending)
/// 5. projectiles, then transient effects
/// 6. mana regen, combo decay
/// 7. terminal check (defeat before victory)
///
/// An ended session is left untouched.
pub fn tick<R: RandomSource>(
    state: &mut WorldState,
    input: InputFrame,
    catalog: &AbilityCatalog,
    config: &SimConfig,
    rng: &mut R,
) -> TickResult {
    if state.is_ended() {
        return TickResult {
            tick: state.tick,
            outcome: state.outcome(),
            ..TickResult::default()
        };
    }

    state.tick += 1;
    state.input = input;

    update_player(state, config);
    update_enemies(state, config);

    if !state.player.is_dead() {
        resolve_player_melee(state, rng, &config.combat, &config.combo);
    }
    resolve_hostile_melee(state, rng, &config.combat);

    state.slots.tick_cooldowns();
    process_deferred(state, config, rng);
    let mut activations = Vec::new();
    if !state.player.is_dead() {
        let requested: Vec<usize> = state.input.requested_slots().collect();
        for slot in requested {
            activations.push((slot, try_activate(state, catalog, config, rng, slot)));
        }
    }

    advance_projectiles(state, config.abilities.projectile_hit_radius, &config.combat);
    age_effects(&mut state.effects);

    regenerate_mana(state, &config.abilities);
    let change = state.combo.tick(&config.combo);
    state.note_tier_change(change);

    debug_assert!(state.player.body.health_in_bounds());
    debug_assert!(state.player.mana <= state.player.max_mana);

    let outcome = check_terminal(state);

    let mut events = state.take_events();
    sort_events(&mut events);

    tracing::trace!(tick = state.tick, events = events.len(), "tick complete");
    #[cfg(feature = "debug-tracing")]
    tracing::trace!(tick = state.tick, hash = %hex::encode(state.compute_hash()), "state hash");

    TickResult {
        tick: state.tick,
        events,
        activations,
        outcome,
    }
}

/// Movement, jump and kinematics for the player.
fn update_player(state: &mut WorldState, config: &SimConfig) {
    let physics = &config.physics;
    let input = state.input;

    let player = &mut state.player;
    player.melee_cooldown = player.melee_cooldown.saturating_sub(1);
    steer(&mut player.body, input.horizontal(), physics);
    if input.jump_pressed() {
        try_jump(&mut player.body, physics);
    }

    let fell_out = integrate(&mut player.body, physics, state.world_width, state.fall_limit);
    if fell_out {
        let spawn = state.player.spawn_point;
        state.player.body.respawn(spawn);
        let dealt = damage_player(state, physics.fall_penalty, DamageSource::Environment);
        state.push_event(GameEvent::player_respawned(state.tick, dealt));
        tracing::debug!(tick = state.tick, penalty = dealt, "player fell out");
    }

    resolve_platforms(&mut state.player.body, &state.platforms);
}

/// Pursuit and kinematics for every living hostile actor.
fn update_enemies(state: &mut WorldState, config: &SimConfig) {
    let player_center = state.player.body.center();
    let terrain = Terrain {
        platforms: &state.platforms,
        world_width: state.world_width,
        fall_limit: state.fall_limit,
    };

    let mut fallen = Vec::new();
    for actor in state.enemies.iter_mut().filter(|e| e.alive) {
        if advance_actor(actor, player_center, &config.physics, &config.enemy, &terrain) {
            fallen.push(actor.id);
        }
    }

    for id in fallen {
        apply_damage(state, id, config.physics.fall_penalty, DamageSource::Environment, &config.combat);
    }
}

fn regenerate_mana(state: &mut WorldState, config: &AbilityConfig) {
    if config.mana_regen_interval == 0 || state.tick % config.mana_regen_interval != 0 {
        return;
    }
    let old = state.player.mana;
    let new = state.player.restore_mana(config.mana_regen_amount);
    if new != old {
        state.push_event(GameEvent::player_mana_changed(state.tick, old, new));
    }
}

/// Enter the terminal phase if the player died or the roster is cleared.
fn check_terminal(state: &mut WorldState) -> Option<Outcome> {
    let outcome = if state.player.is_dead() {
        Outcome::Defeat
    } else if state.alive_enemy_count() == 0 {
        Outcome::Victory
    } else {
        return None;
    };

    state.phase = SimPhase::Ended(outcome);
    state.push_event(GameEvent::terminal_state(state.tick, outcome));
    tracing::info!(
        tick = state.tick,
        ?outcome,
        score = state.progression.score,
        kills = state.progression.kills,
        "session ended"
    );
    Some(outcome)
}

// =============================================================================
// SIMULATION
// =============================================================================

/// A session: world state plus the catalog, tuning and random source that
/// drive it. Inputs applied through [`Simulation::tick`] and slot
/// rebindings are recorded for replay.
pub struct Simulation<R: RandomSource = DeterministicRng> {
    state: WorldState,
    catalog: AbilityCatalog,
    config: SimConfig,
    rng: R,
    recording: InputRecording,
}

impl Simulation<DeterministicRng> {
    /// Start a session seeded with `seed`.
    pub fn new(level: &Level, catalog: AbilityCatalog, config: SimConfig, seed: u64) -> Self {
        Self::with_rng(level, catalog, config, seed, DeterministicRng::new(seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Start a session with an injected random source.
    pub fn with_rng(
        level: &Level,
        catalog: AbilityCatalog,
        config: SimConfig,
        seed: u64,
        rng: R,
    ) -> Self {
        tracing::info!(
            level = %level.name,
            seed,
            enemies = level.roster.len(),
            abilities = catalog.len(),
            "session started"
        );
        Self {
            state: WorldState::from_level(level, seed),
            catalog,
            config,
            rng,
            recording: InputRecording::new(seed),
        }
    }

    /// Rebind ability slots from the learned set. The change is recorded
    /// against the next tick.
    pub fn set_learned_abilities(&mut self, learned: &[AbilityId]) {
        if self.state.is_ended() {
            return;
        }
        self.recording.record_bindings(self.state.tick + 1, learned);
        self.state.slots.populate(&self.catalog, learned);
    }

    /// Advance one tick with `input`.
    pub fn tick(&mut self, input: InputFrame) -> TickResult {
        if !self.state.is_ended() {
            self.recording.record(self.state.tick + 1, input);
        }
        tick(&mut self.state, input, &self.catalog, &self.config, &mut self.rng)
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Direct state access for scripted scenarios.
    pub fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    /// Inputs applied so far.
    pub fn recording(&self) -> &InputRecording {
        &self.recording
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.state)
    }

    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash()
    }
}

/// Re-run a session from recorded inputs.
///
/// `sim` must be freshly created with the recording's seed. Slot
/// bindings, including the starting ones, come from the recording.
/// Stops early at the terminal state.
pub fn replay<R: RandomSource>(
    mut sim: Simulation<R>,
    recording: &InputRecording,
    tick_count: u32,
) -> (Simulation<R>, Vec<GameEvent>) {
    let mut all_events = Vec::new();

    for _ in 0..tick_count {
        let next = sim.state.tick + 1;
        if let Some(learned) = recording.bindings_at(next) {
            sim.set_learned_abilities(learned);
        }
        let frame = recording.frame_at(next);
        let result = sim.tick(frame);
        all_events.extend(result.events);
        if result.outcome.is_some() {
            break;
        }
    }

    (sim, all_events)
}

// =============================================================================
// FRAME ACCUMULATOR
// =============================================================================

/// Converts variable frame time into whole fixed ticks.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_catch_up: u32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32, max_catch_up: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / tick_rate.max(1),
            accumulator: Duration::ZERO,
            max_catch_up: max_catch_up.max(1),
        }
    }

    /// Duration of one tick.
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add `elapsed` frame time and return how many ticks to run.
    ///
    /// At most `max_catch_up` ticks are returned; time beyond that is
    /// dropped so a long stall does not cause a burst.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_catch_up {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }
}

// =============================================================================
// TESTS
// =============================================================================
