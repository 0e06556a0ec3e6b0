//! Text rendering of remaining time

/// Clock face text, e.g. `25:00`, `00:09`
pub fn display_text(remaining_secs: u32) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Spoken form of the remaining time
///
/// - under a minute: "45 seconds"
/// - whole minutes: "2 minutes"
/// - otherwise: "1 minutes and 30 seconds"
pub fn speech_text(remaining_secs: u32) -> String {
    let minutes = remaining_secs / 60;
    let seconds = remaining_secs % 60;

    if minutes == 0 {
        format!("{seconds} seconds")
    } else if seconds == 0 {
        format!("{minutes} minutes")
    } else {
        format!("{minutes} minutes and {seconds} seconds")
    }
}
