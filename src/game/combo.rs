//! Combo Tracker
//!
//! Hit-streak counter with a tiered damage multiplier and a decay window.
//! The window is counted in simulation ticks, so decay stays in lockstep
//! with every other timed mechanic.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, FIXED_ONE, to_fixed};
use crate::error::DataError;

/// One row of the tier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTier {
    /// Minimum hit count for this tier
    pub threshold: u32,
    /// Damage multiplier while in this tier
    pub multiplier: Fixed,
}

/// Tier table and decay window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Ascending thresholds; the first must be 0
    pub tiers: Vec<ComboTier>,
    /// Ticks without a hit before the combo resets
    pub decay_ticks: u32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                ComboTier { threshold: 0, multiplier: FIXED_ONE },
                ComboTier { threshold: 5, multiplier: to_fixed(1.5) },
                ComboTier { threshold: 10, multiplier: to_fixed(2.0) },
                ComboTier { threshold: 20, multiplier: to_fixed(3.0) },
            ],
            decay_ticks: 180,
        }
    }
}

impl ComboConfig {
    /// Check table ordering.
    pub fn validate(&self) -> Result<(), DataError> {
        match self.tiers.first() {
            Some(t) if t.threshold == 0 => {}
            _ => return Err(DataError::InvalidConfig("combo tiers must start at threshold 0".into())),
        }
        for pair in self.tiers.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(DataError::InvalidConfig("combo thresholds must be strictly ascending".into()));
            }
            if pair[1].multiplier <= pair[0].multiplier {
                return Err(DataError::InvalidConfig("combo multipliers must be strictly ascending".into()));
            }
        }
        if self.decay_ticks == 0 {
            return Err(DataError::InvalidConfig("combo decay window must be positive".into()));
        }
        Ok(())
    }

    /// Index of the highest tier whose threshold does not exceed `hits`.
    pub fn tier_for(&self, hits: u32) -> usize {
        self.tiers
            .iter()
            .rposition(|t| t.threshold <= hits)
            .unwrap_or(0)
    }

    /// Multiplier of a tier index (1.0 if out of range).
    pub fn multiplier_of(&self, tier: usize) -> Fixed {
        self.tiers.get(tier).map_or(FIXED_ONE, |t| t.multiplier)
    }
}

/// A tier transition, reported for event emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierChange {
    pub old_tier: u8,
    pub new_tier: u8,
    pub multiplier: Fixed,
    pub hits: u32,
}

/// Live combo state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTracker {
    /// Consecutive hits
    pub hits: u32,
    /// Current tier index
    pub tier: u8,
    /// Current multiplier
    pub multiplier: Fixed,
    /// Inside a streak
    pub active: bool,
    /// Ticks left before decay
    pub decay_remaining: u32,
    /// A hit landed during the current tick; cleared by the next `tick`
    #[serde(skip)]
    fresh_hit: bool,
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self {
            hits: 0,
            tier: 0,
            multiplier: FIXED_ONE,
            active: false,
            decay_remaining: 0,
            fresh_hit: false,
        }
    }
}

impl ComboTracker {
    /// Count a hit and restart the decay window.
    pub fn register_hit(&mut self, config: &ComboConfig) -> Option<TierChange> {
        self.hits = self.hits.saturating_add(1);
        self.active = true;
        self.decay_remaining = config.decay_ticks;
        self.fresh_hit = true;
        self.retier(config)
    }

    /// Advance the decay window by one tick. The tick that registered a
    /// hit does not count, so the window spans `decay_ticks` whole ticks
    /// after it.
    pub fn tick(&mut self, config: &ComboConfig) -> Option<TierChange> {
        if std::mem::take(&mut self.fresh_hit) {
            return None;
        }
        if !self.active || self.decay_remaining == 0 {
            return None;
        }
        self.decay_remaining -= 1;
        if self.decay_remaining == 0 {
            self.reset(config)
        } else {
            None
        }
    }

    /// Drop the streak immediately.
    pub fn break_combo(&mut self, config: &ComboConfig) -> Option<TierChange> {
        if !self.active && self.hits == 0 {
            return None;
        }
        self.reset(config)
    }

    fn reset(&mut self, config: &ComboConfig) -> Option<TierChange> {
        self.hits = 0;
        self.active = false;
        self.decay_remaining = 0;
        self.fresh_hit = false;
        self.retier(config)
    }

    fn retier(&mut self, config: &ComboConfig) -> Option<TierChange> {
        let old_tier = self.tier;
        let new_tier = config.tier_for(self.hits) as u8;
        self.tier = new_tier;
        self.multiplier = config.multiplier_of(new_tier as usize);

        (old_tier != new_tier).then_some(TierChange {
            old_tier,
            new_tier,
            multiplier: self.multiplier,
            hits: self.hits,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
