//! Visual urgency ramp for the final seconds of a countdown

use serde::Serialize;

/// Remaining seconds at which the ramp begins
pub const RAMP_WINDOW_SECS: u32 = 15;

/// Seconds over which the ramp climbs from baseline to full
pub const RAMP_LENGTH_SECS: u32 = 10;

pub const BASELINE_INTENSITY: f32 = 0.1;
pub const FULL_INTENSITY: f32 = 1.0;

/// What a renderer needs to show urgency
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualState {
    /// In [0.1, 1.0]
    pub intensity: f32,
    /// Flashing indicator active (final seconds, not yet expired)
    pub flashing: bool,
    /// "Time's up" state; persists until reset or cancel
    pub expired: bool,
}

impl VisualState {
    pub const BASELINE: Self = Self {
        intensity: BASELINE_INTENSITY,
        flashing: false,
        expired: false,
    };

    pub const EXPIRED: Self = Self {
        intensity: FULL_INTENSITY,
        flashing: false,
        expired: true,
    };

    /// Derive the visual state from the remaining time alone
    pub fn for_remaining(remaining_secs: u32) -> Self {
        if remaining_secs == 0 {
            return Self::EXPIRED;
        }
        if remaining_secs > RAMP_WINDOW_SECS {
            return Self::BASELINE;
        }

        let elapsed_in_window = (RAMP_WINDOW_SECS - remaining_secs) as f32;
        let progress = (elapsed_in_window / RAMP_LENGTH_SECS as f32).min(1.0);
        Self {
            intensity: BASELINE_INTENSITY + progress * (FULL_INTENSITY - BASELINE_INTENSITY),
            flashing: true,
            expired: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn ramp_checkpoints() {
        assert!(close(VisualState::for_remaining(15).intensity, 0.1));
        assert!(close(VisualState::for_remaining(10).intensity, 0.55));
        assert!(close(VisualState::for_remaining(5).intensity, 1.0));
        assert!(close(VisualState::for_remaining(1).intensity, 1.0));
    }

    #[test]
    fn outside_window_is_baseline() {
        assert_eq!(VisualState::for_remaining(16), VisualState::BASELINE);
        assert_eq!(VisualState::for_remaining(3600), VisualState::BASELINE);
    }

    #[test]
    fn zero_pins_expired() {
        let state = VisualState::for_remaining(0);
        assert!(close(state.intensity, 1.0));
        assert!(state.expired);
        assert!(!state.flashing);
    }

    #[test]
    fn ramp_is_monotonic() {
        let mut previous = 0.0;
        for remaining in (1..=15).rev() {
            let state = VisualState::for_remaining(remaining);
            assert!(state.flashing);
            assert!(state.intensity >= previous);
            previous = state.intensity;
        }
    }
}
