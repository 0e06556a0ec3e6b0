//! Terminal rendering of timer signals
//!
//! The clock is redrawn in place on a single status line. Urgency is shown by
//! blending the clock color toward red as intensity rises, blinking while the
//! flashing indicator is on, and a persistent "TIME'S UP" banner on expiry.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use countdown_core::format::display_text;
use countdown_core::{Notification, TimerSignal, TimerState, VisualState};
use tokio::sync::mpsc;

const CLEAR_LINE: &str = "\r\x1b[2K";
const RESET: &str = "\x1b[0m";
const BLINK: &str = "\x1b[5m";
const BOLD: &str = "\x1b[1m";

/// Foreground/background for one theme
#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: (u8, u8, u8),
    bg: (u8, u8, u8),
}

const LIGHT: Palette = Palette {
    fg: (20, 20, 20),
    bg: (245, 245, 245),
};

const DARK: Palette = Palette {
    fg: (230, 230, 230),
    bg: (18, 18, 18),
};

const ALERT_RED: (u8, u8, u8) = (230, 30, 30);

/// Accumulates signals into what is currently on screen
#[derive(Debug)]
pub struct Screen {
    display: String,
    visual: VisualState,
    state: TimerState,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            display: "00:00".to_string(),
            visual: VisualState::BASELINE,
            state: TimerState::Idle,
        }
    }
}

impl Screen {
    /// Fold one signal in. Returns a line to print above the clock, if any.
    pub fn apply(&mut self, signal: &TimerSignal) -> Option<String> {
        match signal {
            TimerSignal::DisplayUpdated(text) => self.display.clone_from(text),
            TimerSignal::IntensityChanged(visual) => self.visual = *visual,
            TimerSignal::StateChanged(state) => {
                self.state = *state;
                // The last frames may have been skipped
                if *state == TimerState::Expired {
                    self.display = display_text(0);
                    self.visual = VisualState::EXPIRED;
                }
            }
            TimerSignal::Notified(warning @ Notification::Warning { .. }) => {
                return Some(format!("warning: {} remaining", warning.phrase()));
            }
            TimerSignal::Notified(Notification::Alarm) => {
                return Some("Time's up!".to_string());
            }
        }
        None
    }

    /// The status line for the current state, styled for the theme
    pub fn status_line(&self, dark_mode: bool) -> String {
        if self.state == TimerState::Idle {
            return String::new();
        }

        let palette = if dark_mode { DARK } else { LIGHT };
        let (r, g, b) = blend(palette.fg, ALERT_RED, urgency(self.visual.intensity));
        let (br, bg, bb) = palette.bg;

        let mut line = format!("\x1b[38;2;{r};{g};{b}m\x1b[48;2;{br};{bg};{bb}m{BOLD}");
        if self.visual.flashing {
            line.push_str(BLINK);
        }
        line.push_str(&format!(" {} ", self.display));
        line.push_str(RESET);

        match self.state {
            TimerState::Paused => line.push_str("  [paused]"),
            TimerState::Expired => line.push_str("  TIME'S UP"),
            _ => {}
        }
        line
    }
}

/// Map intensity [0.1, 1.0] onto a blend factor [0.0, 1.0]
fn urgency(intensity: f32) -> f32 {
    ((intensity - 0.1) / 0.9).clamp(0.0, 1.0)
}

fn blend(from: (u8, u8, u8), to: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Draw signals until the channel closes
pub async fn run(mut signals: mpsc::Receiver<TimerSignal>, dark_mode: Arc<AtomicBool>) {
    let mut screen = Screen::default();
    while let Some(signal) = signals.recv().await {
        let notice = screen.apply(&signal);
        let status = screen.status_line(dark_mode.load(Ordering::Relaxed));

        let mut out = std::io::stdout().lock();
        let mut frame = String::from(CLEAR_LINE);
        if let Some(notice) = notice {
            frame.push_str(&notice);
            frame.push('\n');
        }
        frame.push_str(&status);
        frame.push_str(if status.is_empty() { "> " } else { "  > " });
        if out.write_all(frame.as_bytes()).and_then(|_| out.flush()).is_err() {
            break;
        }
    }
}
