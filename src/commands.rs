use std::sync::Arc;

use countdown_core::session::{DEFAULT_WARNING_OFFSET, MAX_WARNING_OFFSET};
use countdown_core::{Session, TimerSnapshot, TimerState};
use tokio::sync::RwLock;

use crate::app_state::{AppState, EXIT_GRACE, join_tasks};

/// Start a countdown. Missing minutes/warnings fall back to the saved defaults.
pub async fn start(
    state: Arc<RwLock<AppState>>,
    minutes: Option<String>,
    warn: Vec<String>,
    no_warnings: bool,
) -> Result<(), String> {
    let (minutes, warn, handle) = {
        let s = state.read().await;
        let minutes = minutes.unwrap_or_else(|| s.config.default_minutes.to_string());
        let warn = if no_warnings {
            Vec::new()
        } else if warn.is_empty() {
            s.config.default_warnings.iter().map(u32::to_string).collect()
        } else {
            warn
        };
        (minutes, warn, s.handle.clone())
    };

    let session = Session::from_text(&minutes, &warn).map_err(|e| e.to_string())?;
    let snapshot = handle.start(session).await.map_err(|e| e.to_string())?;
    println!("{}", describe(&snapshot));
    Ok(())
}

pub async fn toggle_pause(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let handle = state.read().await.handle.clone();
    let snapshot = handle
        .request_toggle_pause()
        .await
        .map_err(|e| e.to_string())?;
    println!("{}", describe(&snapshot));
    Ok(())
}

pub async fn resume(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let handle = state.read().await.handle.clone();
    let snapshot = handle.request_resume().await.map_err(|e| e.to_string())?;
    println!("{}", describe(&snapshot));
    Ok(())
}

pub async fn reset(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let handle = state.read().await.handle.clone();
    let snapshot = handle.request_reset().await.map_err(|e| e.to_string())?;
    println!("{}", describe(&snapshot));
    Ok(())
}

pub async fn back(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let handle = state.read().await.handle.clone();
    handle.request_cancel().await.map_err(|e| e.to_string())?;
    let s = state.read().await;
    println!(
        "back to setup (default: {} min, warnings {})",
        s.config.default_minutes,
        list_offsets(&s.config.default_warnings)
    );
    Ok(())
}

pub async fn status(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let handle = state.read().await.handle.clone();
    let snapshot = handle.status().await.map_err(|e| e.to_string())?;
    println!("{}", describe(&snapshot));
    Ok(())
}

/// Add a default warning offset (30 seconds when none is given)
pub async fn add_warning(state: Arc<RwLock<AppState>>, secs: Option<u32>) -> Result<(), String> {
    let secs = secs.unwrap_or(DEFAULT_WARNING_OFFSET);
    let mut s = state.write().await;
    insert_offset(&mut s.config.default_warnings, secs)?;
    s.save_config()?;
    println!("warnings: {}", list_offsets(&s.config.default_warnings));
    Ok(())
}

pub async fn remove_warning(state: Arc<RwLock<AppState>>, secs: u32) -> Result<(), String> {
    let mut s = state.write().await;
    if !remove_offset(&mut s.config.default_warnings, secs) {
        return Err(format!("no warning at {secs}s"));
    }
    s.save_config()?;
    println!("warnings: {}", list_offsets(&s.config.default_warnings));
    Ok(())
}

pub async fn clear_warnings(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let mut s = state.write().await;
    s.config.default_warnings.clear();
    s.save_config()?;
    println!("warnings: none");
    Ok(())
}

pub async fn list_warnings(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    println!("warnings: {}", list_offsets(&s.config.default_warnings));
}

pub async fn toggle_theme(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let dark = state.write().await.toggle_dark_mode()?;
    println!("dark mode {}", if dark { "on" } else { "off" });
    Ok(())
}

/// Toggle all audio for this session (not persisted)
pub async fn toggle_mute(state: Arc<RwLock<AppState>>) {
    let audio = Arc::clone(&state.read().await.audio);
    let mut settings = audio.write().await;
    settings.enabled = !settings.enabled;
    println!("audio {}", if settings.enabled { "on" } else { "muted" });
}

/// Stop the timer, then give queued tones and speech a moment to finish
pub async fn exit(state: Arc<RwLock<AppState>>) {
    let (handle, tasks) = {
        let mut s = state.write().await;
        (s.handle.clone(), std::mem::take(&mut s.tasks))
    };
    handle.shutdown().await;
    println!("quitting...");
    join_tasks(tasks, EXIT_GRACE).await;
}

/// One-line summary of a snapshot
pub fn describe(snapshot: &TimerSnapshot) -> String {
    let warnings = list_offsets(&snapshot.warnings);
    match snapshot.state {
        TimerState::Idle => format!("idle (last warnings: {warnings})"),
        TimerState::Expired => "time's up (reset to run again)".to_string(),
        state => format!(
            "{state} {} | warnings: {warnings} | fired: {} | pause: {}",
            snapshot.display,
            list_offsets(&snapshot.fired_warnings),
            state.pause_label()
        ),
    }
}

fn list_offsets(offsets: &[u32]) -> String {
    if offsets.is_empty() {
        return "none".to_string();
    }
    offsets
        .iter()
        .map(|secs| format!("{secs}s"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keep the list sorted largest first, without duplicates
fn insert_offset(offsets: &mut Vec<u32>, secs: u32) -> Result<(), String> {
    if secs == 0 || i64::from(secs) > MAX_WARNING_OFFSET {
        return Err(format!(
            "warning must be between 1 and {MAX_WARNING_OFFSET} seconds"
        ));
    }
    if !offsets.contains(&secs) {
        offsets.push(secs);
        offsets.sort_unstable_by(|a, b| b.cmp(a));
    }
    Ok(())
}

fn remove_offset(offsets: &mut Vec<u32>, secs: u32) -> bool {
    let before = offsets.len();
    offsets.retain(|&o| o != secs);
    offsets.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_core::VisualState;

    fn snapshot(state: TimerState) -> TimerSnapshot {
        TimerSnapshot {
            state,
            remaining_secs: 95,
            display: "01:35".to_string(),
            visual: VisualState::BASELINE,
            warnings: vec![30, 10],
            fired_warnings: vec![],
        }
    }

    #[test]
    fn describe_running() {
        assert_eq!(
            describe(&snapshot(TimerState::Running)),
            "running 01:35 | warnings: 30s, 10s | fired: none | pause: Pause"
        );
        assert_eq!(
            describe(&snapshot(TimerState::Expired)),
            "time's up (reset to run again)"
        );
    }

    #[test]
    fn offsets_stay_sorted_and_unique() {
        let mut offsets = vec![30];
        insert_offset(&mut offsets, 10).unwrap();
        insert_offset(&mut offsets, 45).unwrap();
        insert_offset(&mut offsets, 10).unwrap();
        assert_eq!(offsets, vec![45, 30, 10]);

        assert!(insert_offset(&mut offsets, 0).is_err());
        assert!(insert_offset(&mut offsets, 61).is_err());

        assert!(remove_offset(&mut offsets, 30));
        assert!(!remove_offset(&mut offsets, 30));
        assert_eq!(offsets, vec![45, 10]);
    }

    #[test]
    fn empty_list_reads_none() {
        assert_eq!(list_offsets(&[]), "none");
    }
}
