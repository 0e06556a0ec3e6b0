//! Session intake and validation
//!
//! A `Session` is the immutable configuration of one countdown run: its
//! duration and the remaining-seconds values at which warnings fire.

use hashbrown::HashSet;

use crate::error::SessionError;

pub const MIN_MINUTES: i64 = 1;
pub const MAX_MINUTES: i64 = 60;

/// Largest accepted warning offset (seconds remaining)
pub const MAX_WARNING_OFFSET: i64 = 60;

/// Offset suggested for a newly added warning
pub const DEFAULT_WARNING_OFFSET: u32 = 30;

/// Configuration for one countdown run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    initial_duration_secs: u32,
    warning_offsets: HashSet<u32>,
}

impl Session {
    /// Validate a start request.
    ///
    /// The duration must be within [1, 60] minutes. Offsets outside (0, 60]
    /// are dropped rather than failing the request; duplicates collapse.
    pub fn from_request(
        minutes: i64,
        offsets: impl IntoIterator<Item = i64>,
    ) -> Result<Self, SessionError> {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
            return Err(SessionError::InvalidDuration(minutes));
        }

        let mut warning_offsets = HashSet::new();
        for offset in offsets {
            if offset > 0 && offset <= MAX_WARNING_OFFSET {
                warning_offsets.insert(offset as u32);
            } else {
                tracing::debug!(offset, "Dropping out-of-range warning offset");
            }
        }

        Ok(Self {
            initial_duration_secs: (minutes * 60) as u32,
            warning_offsets,
        })
    }

    /// Validate a start request given as raw text fields.
    ///
    /// Numbers are read the lenient way form inputs are: leading whitespace is
    /// skipped and trailing garbage after the digits is ignored ("7s" is 7).
    /// An unreadable duration is a validation error; an unreadable offset is
    /// dropped.
    pub fn from_text<S: AsRef<str>>(minutes: &str, offsets: &[S]) -> Result<Self, SessionError> {
        let minutes = parse_int_prefix(minutes)
            .ok_or_else(|| SessionError::UnparsableDuration(minutes.to_string()))?;
        let offsets = offsets.iter().filter_map(|raw| {
            let parsed = parse_int_prefix(raw.as_ref());
            if parsed.is_none() {
                tracing::debug!(raw = raw.as_ref(), "Dropping unparsable warning offset");
            }
            parsed
        });
        Self::from_request(minutes, offsets)
    }

    pub fn initial_duration_secs(&self) -> u32 {
        self.initial_duration_secs
    }

    pub fn has_warning_at(&self, remaining_secs: u32) -> bool {
        self.warning_offsets.contains(&remaining_secs)
    }

    /// Warning offsets, largest (earliest to fire) first
    pub fn warning_offsets(&self) -> Vec<u32> {
        let mut offsets: Vec<u32> = self.warning_offsets.iter().copied().collect();
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets
    }
}

/// Read a leading integer: optional whitespace, optional sign, then digits.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    // Saturate absurdly long inputs; they fail range validation either way
    let value = rest[..digits_end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bounds_are_inclusive() {
        assert_eq!(
            Session::from_request(1, []).unwrap().initial_duration_secs(),
            60
        );
        assert_eq!(
            Session::from_request(60, []).unwrap().initial_duration_secs(),
            3600
        );
        assert_eq!(
            Session::from_request(0, []),
            Err(SessionError::InvalidDuration(0))
        );
        assert_eq!(
            Session::from_request(61, []),
            Err(SessionError::InvalidDuration(61))
        );
    }

    #[test]
    fn bad_offsets_are_dropped_and_duplicates_collapse() {
        let session = Session::from_request(5, [30, 30, 0, -4, 61, 60, 1]).unwrap();
        assert_eq!(session.warning_offsets(), vec![60, 30, 1]);
        assert!(session.has_warning_at(30));
        assert!(!session.has_warning_at(0));
    }

    #[test]
    fn text_intake_reads_leading_integers() {
        let session = Session::from_text(" 25min", &["10", "5s", "abc", "", "99"]).unwrap();
        assert_eq!(session.initial_duration_secs(), 1500);
        assert_eq!(session.warning_offsets(), vec![10, 5]);
    }

    #[test]
    fn text_intake_rejects_unreadable_duration() {
        assert_eq!(
            Session::from_text("soon", &[] as &[&str]),
            Err(SessionError::UnparsableDuration("soon".to_string()))
        );
        assert_eq!(
            Session::from_text("-3", &[] as &[&str]),
            Err(SessionError::InvalidDuration(-3))
        );
    }

    #[test]
    fn int_prefix_parsing() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  +7x"), Some(7));
        assert_eq!(parse_int_prefix("3.9"), Some(3));
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("x1"), None);
    }
}
