//! Shared configuration types for the countdown timer
//!
//! This crate contains serializable configuration types that are shared between
//! the timer core (countdown-core) and the terminal front end.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Tone Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// A single tone: pitch and length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    /// Pitch in Hz
    pub frequency_hz: f32,
    /// Length in seconds
    pub duration_secs: f32,
}

impl ToneSpec {
    pub const fn new(frequency_hz: f32, duration_secs: f32) -> Self {
        Self {
            frequency_hz,
            duration_secs,
        }
    }

    /// Short, high-pitched beep for warning checkpoints
    pub const fn warning() -> Self {
        Self::new(880.0, 0.3)
    }

    /// Longer, lower tone for expiry
    pub const fn alarm() -> Self {
        Self::new(440.0, 0.5)
    }

    /// Brief tone played once when audio output comes up
    pub const fn test() -> Self {
        Self::new(440.0, 0.1)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Audio Settings
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_audio_volume() -> u8 {
    80
}

fn default_speech_command() -> String {
    "espeak".to_string()
}

fn default_speech_gap_ms() -> u64 {
    1000
}

fn default_warning_tone() -> ToneSpec {
    ToneSpec::warning()
}

fn default_alarm_tone() -> ToneSpec {
    ToneSpec::alarm()
}

/// Audio notification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master enable for all audio
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Volume level (0-100)
    #[serde(default = "default_audio_volume")]
    pub volume: u8,

    /// Play tones on warnings and expiry
    #[serde(default = "default_true")]
    pub tones_enabled: bool,

    /// Speak remaining time on warnings and "Time's up!" on expiry
    #[serde(default = "default_true")]
    pub speech_enabled: bool,

    /// Program invoked with the phrase as its only argument. Linux only;
    /// other platforms use the native voice.
    #[serde(default = "default_speech_command")]
    pub speech_command: String,

    /// Spacing between the starts of two utterances. Can only lengthen the
    /// 1000 ms floor.
    #[serde(default = "default_speech_gap_ms")]
    pub speech_gap_ms: u64,

    #[serde(default = "default_warning_tone")]
    pub warning_tone: ToneSpec,

    #[serde(default = "default_alarm_tone")]
    pub alarm_tone: ToneSpec,

    /// Play a short tone when the audio service starts
    #[serde(default = "default_true")]
    pub test_tone_on_start: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_audio_volume(),
            tones_enabled: true,
            speech_enabled: true,
            speech_command: default_speech_command(),
            speech_gap_ms: default_speech_gap_ms(),
            warning_tone: ToneSpec::warning(),
            alarm_tone: ToneSpec::alarm(),
            test_tone_on_start: true,
        }
    }
}

impl AudioSettings {
    /// Output gain in [0.0, 0.125]; the default volume gives roughly 0.1
    pub fn gain(&self) -> f32 {
        f32::from(self.volume.min(100)) / 100.0 * 0.125
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

fn default_minutes() -> u32 {
    5
}

fn default_warnings() -> Vec<u32> {
    vec![30]
}

/// Persisted application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display preference; has no effect on the timer itself
    #[serde(default)]
    pub dark_mode: bool,

    /// Duration used when `start` is given no minutes
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,

    /// Warning offsets used when `start` is given none
    #[serde(default = "default_warnings")]
    pub default_warnings: Vec<u32>,

    #[serde(default)]
    pub audio: AudioSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            default_minutes: default_minutes(),
            default_warnings: default_warnings(),
            audio: AudioSettings::default(),
        }
    }
}

impl AppConfig {
    /// Flip the dark mode preference, returning the new value
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volume_gives_tenth_gain() {
        let settings = AudioSettings::default();
        assert!((settings.gain() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn volume_above_100_is_clamped() {
        let settings = AudioSettings {
            volume: 255,
            ..AudioSettings::default()
        };
        assert!((settings.gain() - 0.125).abs() < 1e-6);
    }

    #[test]
    fn toggle_dark_mode_flips() {
        let mut config = AppConfig::default();
        assert!(!config.dark_mode);
        assert!(config.toggle_dark_mode());
        assert!(!config.toggle_dark_mode());
    }
}
