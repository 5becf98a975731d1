//! Input Intents and Recording
//!
//! The host samples held keys once per tick into an [`InputFrame`]. Frames
//! are recorded delta-compressed so a session can be replayed exactly.

use serde::{Serialize, Deserialize};

use crate::error::DataError;
use crate::game::catalog::AbilityId;

/// Number of ability activation channels addressable from input.
pub const INPUT_SLOTS: usize = 6;

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Held intents for a single tick, packed into bits.
///
/// - Bit 0: move left
/// - Bit 1: move right
/// - Bit 2: jump
/// - Bit 3: melee attack
/// - Bits 4-9: activate slot 0-5
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Packed intent bits.
    pub flags: u16,
}

impl InputFrame {
    /// Move-left flag bit
    pub const FLAG_LEFT: u16 = 0x0001;

    /// Move-right flag bit
    pub const FLAG_RIGHT: u16 = 0x0002;

    /// Jump flag bit
    pub const FLAG_JUMP: u16 = 0x0004;

    /// Melee attack flag bit
    pub const FLAG_ATTACK: u16 = 0x0008;

    /// First slot bit; slot N is `FLAG_SLOT_BASE << N`.
    pub const FLAG_SLOT_BASE: u16 = 0x0010;

    /// Create an idle frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Builder: hold left.
    pub const fn left(mut self) -> Self {
        self.flags |= Self::FLAG_LEFT;
        self
    }

    /// Builder: hold right.
    pub const fn right(mut self) -> Self {
        self.flags |= Self::FLAG_RIGHT;
        self
    }

    /// Builder: press jump.
    pub const fn jump(mut self) -> Self {
        self.flags |= Self::FLAG_JUMP;
        self
    }

    /// Builder: press melee attack.
    pub const fn attack(mut self) -> Self {
        self.flags |= Self::FLAG_ATTACK;
        self
    }

    /// Builder: press an ability slot. Out-of-range slots are ignored.
    pub const fn slot(mut self, index: usize) -> Self {
        if index < INPUT_SLOTS {
            self.flags |= Self::FLAG_SLOT_BASE << index;
        }
        self
    }

    /// Horizontal intent: -1 (left), 0 (none or both), +1 (right).
    #[inline]
    pub fn horizontal(&self) -> i32 {
        let left = self.flags & Self::FLAG_LEFT != 0;
        let right = self.flags & Self::FLAG_RIGHT != 0;
        match (left, right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Check if jump is held.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if melee attack is held.
    #[inline]
    pub fn attack_pressed(&self) -> bool {
        self.flags & Self::FLAG_ATTACK != 0
    }

    /// Check if an ability slot is requested.
    #[inline]
    pub fn slot_pressed(&self, index: usize) -> bool {
        index < INPUT_SLOTS && self.flags & (Self::FLAG_SLOT_BASE << index) != 0
    }

    /// Requested slots in ascending order.
    pub fn requested_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..INPUT_SLOTS).filter(move |i| self.slot_pressed(*i))
    }

    /// Check if this is an idle frame (no intents).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

/// Delta-compressed input entry.
///
/// Only stored when input CHANGES (not every tick).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

/// Slot rebinding applied just before a tick runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingChange {
    /// Tick the new bindings first apply to
    pub tick: u32,
    /// Learned set passed to slot population
    pub learned: Vec<AbilityId>,
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Complete input recording for one session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// RNG seed the session was started with
    pub rng_seed: u64,

    /// Last tick recorded
    pub end_tick: u32,

    /// Only ticks where input CHANGED.
    deltas: Vec<InputDelta>,

    /// Slot rebindings in tick order, at most one per tick.
    bindings: Vec<BindingChange>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecording {
    /// Create an empty recording for a session seed.
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            bindings: Vec::new(),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick. Only stores if it changed.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta { tick, frame });
            self.last_frame = frame;
        }
    }

    /// Input held at a specific tick.
    pub fn frame_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// All recorded deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Record a slot rebinding that applies before `tick`. A second
    /// rebinding for the same tick replaces the first.
    pub fn record_bindings(&mut self, tick: u32, learned: &[AbilityId]) {
        match self.bindings.last_mut() {
            Some(last) if last.tick == tick => last.learned = learned.to_vec(),
            _ => self.bindings.push(BindingChange {
                tick,
                learned: learned.to_vec(),
            }),
        }
    }

    /// Rebinding applied before `tick`, if any.
    pub fn bindings_at(&self, tick: u32) -> Option<&[AbilityId]> {
        let idx = self.bindings.partition_point(|b| b.tick < tick);
        self.bindings
            .get(idx)
            .filter(|b| b.tick == tick)
            .map(|b| b.learned.as_slice())
    }

    /// All recorded rebindings.
    pub fn bindings(&self) -> &[BindingChange] {
        &self.bindings
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DataError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a recording produced by [`InputRecording::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, DataError> {
        let mut recording: Self = bincode::deserialize(data)?;
        recording.last_frame = recording
            .deltas
            .last()
            .map(|d| d.frame)
            .unwrap_or_default();
        Ok(recording)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_frame_flags() {
        let frame = InputFrame::new().right().jump().slot(2);
        assert_eq!(frame.horizontal(), 1);
        assert!(frame.jump_pressed());
        assert!(!frame.attack_pressed());
        assert!(frame.slot_pressed(2));
        assert!(!frame.slot_pressed(1));
        assert_eq!(frame.requested_slots().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_opposing_directions_cancel() {
        assert_eq!(InputFrame::new().left().right().horizontal(), 0);
        assert_eq!(InputFrame::new().left().horizontal(), -1);
        assert_eq!(InputFrame::new().horizontal(), 0);
    }

    #[test]
    fn test_out_of_range_slot_ignored() {
        let frame = InputFrame::new().slot(INPUT_SLOTS);
        assert!(frame.is_idle());
        assert!(!frame.slot_pressed(INPUT_SLOTS));
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut recording = InputRecording::new(7);

        let frame = InputFrame::new().right();
        for t in 0..4 {
            recording.record(t, frame);
        }
        assert_eq!(recording.deltas().len(), 1);

        recording.record(4, InputFrame::new().left());
        assert_eq!(recording.deltas().len(), 2);
    }

    #[test]
    fn test_recording_frame_at() {
        let mut recording = InputRecording::new(7);

        let frame1 = InputFrame::new().right();
        let frame2 = InputFrame::new().left().attack();

        recording.record(10, frame1);
        recording.record(20, frame2);

        assert!(recording.frame_at(5).is_idle());
        assert_eq!(recording.frame_at(10), frame1);
        assert_eq!(recording.frame_at(15), frame1);
        assert_eq!(recording.frame_at(20), frame2);
        assert_eq!(recording.frame_at(500), frame2);
    }

    #[test]
    fn test_recording_bincode_roundtrip() {
        let mut recording = InputRecording::new(99);
        recording.record(1, InputFrame::new().right());
        recording.record(5, InputFrame::new().attack());

        let bytes = recording.to_bytes().unwrap();
        let decoded = InputRecording::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.rng_seed, 99);
        assert_eq!(decoded.end_tick, 5);
        assert_eq!(decoded.deltas(), recording.deltas());
        assert_eq!(decoded.frame_at(3), InputFrame::new().right());
    }

    #[test]
    fn test_recording_bindings() {
        let mut recording = InputRecording::new(3);
        let bolt = vec![AbilityId::new("arcane_bolt")];
        let slash = vec![AbilityId::new("slash")];

        recording.record_bindings(1, &[]);
        recording.record_bindings(6, &bolt);
        recording.record_bindings(6, &slash);

        assert_eq!(recording.bindings().len(), 2);
        assert_eq!(recording.bindings_at(1), Some(&[][..]));
        assert_eq!(recording.bindings_at(5), None);
        assert_eq!(recording.bindings_at(6), Some(slash.as_slice()));

        let bytes = recording.to_bytes().unwrap();
        let decoded = InputRecording::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.bindings(), recording.bindings());
    }
}
