//! Time string parsing and formatting
//!
//! Accepted shapes:
//!
//! - `SS`: total elapsed seconds, no upper cap (`"90"` is 90 seconds, `"9000"` is 9000 seconds)
//! - `HH:MM`: hours and minutes, seconds are always zero
//! - `HH:MM:SS`: hours, minutes and seconds
//!
//! Minutes and seconds of the multi-part shapes must be below 60. The bare
//! form has no such cap, so `"60"` is one minute written in seconds while
//! `"00:60"` is rejected. Components do not need zero padding.

use crate::domain::errors::FormatIssue;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

/// One `:`-separated piece of a time string after lexical classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Value(u64),
    Negative,
    NonNumeric,
    TooLarge,
}

impl Component {
    fn classify(raw: &str) -> Self {
        if is_digits(raw) {
            return match raw.parse::<u64>() {
                Ok(value) => Component::Value(value),
                Err(_) => Component::TooLarge,
            };
        }
        match raw.strip_prefix('-') {
            Some(rest) if is_digits(rest) => Component::Negative,
            _ => Component::NonNumeric,
        }
    }
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a user-entered time string into a count of seconds.
pub fn parse_time_to_seconds(input: &str) -> Result<u64, FormatIssue> {
    let components: Vec<Component> = input.trim().split(':').map(Component::classify).collect();

    if components.contains(&Component::NonNumeric) {
        return Err(FormatIssue::NonNumeric);
    }
    if components.contains(&Component::Negative) {
        return Err(FormatIssue::Negative);
    }

    let mut values = Vec::with_capacity(components.len());
    for component in components {
        match component {
            Component::Value(value) => values.push(value),
            _ => return Err(FormatIssue::TooLarge),
        }
    }

    match values.as_slice() {
        [hours, minutes, seconds] => {
            if *minutes >= SECONDS_PER_MINUTE || *seconds >= SECONDS_PER_MINUTE {
                return Err(FormatIssue::MinuteSecondOverflow);
            }
            combine(*hours, *minutes, *seconds)
        }
        [hours, minutes] => {
            if *minutes >= SECONDS_PER_MINUTE {
                return Err(FormatIssue::MinuteSecondOverflow);
            }
            combine(*hours, *minutes, 0)
        }
        [seconds] => Ok(*seconds),
        _ => Err(FormatIssue::InvalidStructure),
    }
}

fn combine(hours: u64, minutes: u64, seconds: u64) -> Result<u64, FormatIssue> {
    hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(|total| total.checked_add(minutes * SECONDS_PER_MINUTE + seconds))
        .ok_or(FormatIssue::TooLarge)
}

/// Format a second count as `HH:MM:SS`.
///
/// Hours are not wrapped at 24, so long sources render as e.g. `25:00:00`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
