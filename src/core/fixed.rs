//! Q16.16 Fixed-Point Arithmetic
//!
//! Deterministic fixed-point math for the combat simulation.
//! All tick logic uses integer arithmetic only - no floats in gameplay.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 ≈ 0.000015 pixels                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! World coordinates are pixels. A level a few thousand pixels wide fits
//! comfortably; squared distances do NOT, so range checks widen to i64
//! (see `FixedVec2::distance_squared_wide`).

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

// =============================================================================
// DEFAULT TUNING (pixels, pixels/tick, pixels/tick^2 at 60 Hz)
// =============================================================================

/// Gravity: 0.8 px/tick^2
pub const GRAVITY: Fixed = 52428;

/// Terminal fall speed: 20 px/tick
pub const MAX_FALL_SPEED: Fixed = 20 * FIXED_ONE;

/// Jump impulse: -14 px/tick (y grows downward)
pub const JUMP_VELOCITY: Fixed = -14 * FIXED_ONE;

/// Horizontal acceleration while a direction is held: 1.2 px/tick^2
pub const RUN_ACCELERATION: Fixed = 78643;

/// Horizontal speed cap: 6 px/tick
pub const MAX_RUN_SPEED: Fixed = 6 * FIXED_ONE;

/// Multiplicative friction with no horizontal input: 0.8
pub const GROUND_FRICTION: Fixed = 52428;

/// Hostile pursuit speed: 2 px/tick
pub const PURSUIT_SPEED: Fixed = 2 * FIXED_ONE;

/// Hostile friction when not pursuing: 0.8
pub const ENEMY_FRICTION: Fixed = 52428;

/// Velocities below this magnitude snap to zero under friction.
pub const VELOCITY_EPSILON: Fixed = 64;

// =============================================================================
// CORE OPERATIONS (All deterministic)
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in tick loop.
///
/// # Example
/// ```
/// use rift_brawler::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display/rendering.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Fixed-point value of a whole number of pixels.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Floor a fixed-point value to a whole number.
#[inline]
pub const fn floor_to_int(f: Fixed) -> i32 {
    f >> FIXED_SCALE
}

/// Multiply two fixed-point numbers.
///
/// Uses i64 intermediate to prevent overflow, then truncates.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide >> FIXED_SCALE) as Fixed
}

/// Divide two fixed-point numbers.
///
/// Returns 0 on divide-by-zero.
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if b == 0 {
        return 0;
    }
    let wide = (a as i64) << FIXED_SCALE;
    (wide / b as i64) as Fixed
}

/// Square root using Newton-Raphson iteration.
///
/// Returns 0 for non-positive inputs. Fixed iteration count for determinism.
#[inline]
pub fn fixed_sqrt(x: Fixed) -> Fixed {
    if x <= 0 {
        return 0;
    }

    let mut guess = (x >> 1).max(1);

    for _ in 0..6 {
        let div = fixed_div(x, guess);
        guess = (guess.wrapping_add(div)) >> 1;

        if guess == 0 {
            guess = 1;
        }
    }

    guess
}

/// Absolute value of a fixed-point number.
#[inline]
pub fn fixed_abs(x: Fixed) -> Fixed {
    if x < 0 { x.wrapping_neg() } else { x }
}

/// Clamp a fixed-point number to a range.
#[inline]
pub fn fixed_clamp(value: Fixed, min: Fixed, max: Fixed) -> Fixed {
    value.max(min).min(max)
}

/// Scale a whole amount (damage, score) by a fixed-point multiplier,
/// flooring the result.
///
/// ```
/// use rift_brawler::core::fixed::{scale_amount, to_fixed};
/// assert_eq!(scale_amount(15, to_fixed(1.5)), 22);
/// ```
#[inline]
pub fn scale_amount(amount: u32, multiplier: Fixed) -> u32 {
    if multiplier <= 0 {
        return 0;
    }
    let wide = (amount as u64) * (multiplier as u64);
    (wide >> FIXED_SCALE).min(u32::MAX as u64) as u32
}

/// Apply multiplicative friction, snapping tiny residues to zero.
#[inline]
pub fn apply_friction(velocity: Fixed, factor: Fixed) -> Fixed {
    let v = fixed_mul(velocity, factor);
    if fixed_abs(v) < VELOCITY_EPSILON { 0 } else { v }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constants() {
        assert_eq!(FIXED_ONE, 65536);
        assert_eq!(FIXED_HALF, 32768);
        assert_eq!(from_int(3), 3 * FIXED_ONE);
        assert_eq!(floor_to_int(to_fixed(2.75)), 2);
    }

    #[test]
    fn test_fixed_mul_div() {
        assert_eq!(fixed_mul(to_fixed(2.0), to_fixed(3.0)), to_fixed(6.0));
        assert_eq!(fixed_mul(to_fixed(-2.0), to_fixed(3.0)), to_fixed(-6.0));
        assert_eq!(fixed_div(to_fixed(6.0), to_fixed(2.0)), to_fixed(3.0));
        assert_eq!(fixed_div(FIXED_ONE, 0), 0);
    }

    #[test]
    fn test_fixed_sqrt() {
        let result = fixed_sqrt(to_fixed(4.0));
        assert!((result - to_fixed(2.0)).abs() < 100, "sqrt(4) should be ~2.0");
        assert_eq!(fixed_sqrt(0), 0);
        assert_eq!(fixed_sqrt(-FIXED_ONE), 0);
    }

    #[test]
    fn test_scale_amount_floors() {
        assert_eq!(scale_amount(15, FIXED_ONE), 15);
        assert_eq!(scale_amount(15, to_fixed(1.5)), 22);
        assert_eq!(scale_amount(7, to_fixed(2.0)), 14);
        assert_eq!(scale_amount(0, to_fixed(3.0)), 0);
        assert_eq!(scale_amount(10, 0), 0);
    }

    #[test]
    fn test_friction_converges_to_zero() {
        let mut v = MAX_RUN_SPEED;
        for _ in 0..200 {
            v = apply_friction(v, GROUND_FRICTION);
        }
        assert_eq!(v, 0);

        let mut v = -MAX_RUN_SPEED;
        for _ in 0..200 {
            v = apply_friction(v, GROUND_FRICTION);
        }
        assert_eq!(v, 0);
    }

    #[test]
    fn test_default_tuning() {
        // 0.8 within one raw unit
        assert!((GRAVITY - to_fixed(0.8)).abs() <= 1);
        assert!((GROUND_FRICTION - to_fixed(0.8)).abs() <= 1);
        assert!((RUN_ACCELERATION - to_fixed(1.2)).abs() <= 1);
        assert!(JUMP_VELOCITY < 0, "jump must point up (negative y)");
    }
}
