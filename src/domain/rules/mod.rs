// Domain rules - Clip range policy

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::time::format_hms;

/// Longest clip we are willing to cut, in seconds
pub const MAX_CLIP_SECONDS: u64 = 300;

/// Business rules for turning user-entered times into a clip range.
///
/// The same rules back both the pre-submission check, which runs before the
/// source is looked up, and the authoritative check once its duration is known.
pub struct ClipRangeValidator;

impl ClipRangeValidator {
    /// Validate a requested interval against the source duration.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// format, ordering, source length, duration cap.
    pub fn validate(
        raw_start: &str,
        raw_end: &str,
        source_duration_seconds: u64,
    ) -> Result<ClipRange, ClipError> {
        let (start, end) = Self::parse_bounds(raw_start, raw_end)?;

        if start >= end {
            return Err(ClipError::Ordering);
        }

        if end.seconds > source_duration_seconds {
            return Err(ClipError::RangeExceeded {
                source_duration: format_hms(source_duration_seconds),
            });
        }

        ClipRange::from_bounds(start, end)
    }

    /// Run every check that does not need the source duration
    pub fn precheck(raw_start: &str, raw_end: &str) -> Result<ClipRange, ClipError> {
        let (start, end) = Self::parse_bounds(raw_start, raw_end)?;
        ClipRange::from_bounds(start, end)
    }

    fn parse_bounds(raw_start: &str, raw_end: &str) -> Result<(TimeSpec, TimeSpec), ClipError> {
        let start = TimeSpec::parse(raw_start)
            .map_err(|issue| ClipError::format(TimeField::Start, raw_start, issue))?;
        let end = TimeSpec::parse(raw_end)
            .map_err(|issue| ClipError::format(TimeField::End, raw_end, issue))?;
        Ok((start, end))
    }
}

/// Business rules for source accessibility
pub struct SourcePolicy;

impl SourcePolicy {
    /// Reject sources the lookup reported as unusable
    pub fn ensure_accessible(media: &MediaRef, info: &SourceInfo) -> Result<(), ClipError> {
        if info.is_accessible {
            Ok(())
        } else {
            Err(ClipError::SourceUnavailable(format!(
                "{} is not accessible",
                media.video_id()
            )))
        }
    }
}

#[cfg(test)]
mod tests;
