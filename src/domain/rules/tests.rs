// Unit tests for clip range policy

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;

#[test]
fn test_validate_accepts_range_inside_source() {
    let range = ClipRangeValidator::validate("00:00:05", "00:00:35", 3600).unwrap();
    assert_eq!(range.start().seconds, 5);
    assert_eq!(range.duration_seconds(), 30);
}

#[test]
fn test_validate_start_after_end() {
    assert_eq!(
        ClipRangeValidator::validate("00:00:10", "00:00:05", 120),
        Err(ClipError::Ordering)
    );
    assert_eq!(
        ClipRangeValidator::validate("30", "30", 120),
        Err(ClipError::Ordering)
    );
}

#[test]
fn test_validate_duration_over_cap() {
    assert_eq!(
        ClipRangeValidator::validate("00:00:00", "00:06:00", 1000),
        Err(ClipError::DurationExceeded { duration: 360, cap: 300 })
    );
}

#[test]
fn test_validate_end_past_source() {
    let err = ClipRangeValidator::validate("00:00:00", "00:00:30", 10).unwrap_err();
    assert_eq!(
        err,
        ClipError::RangeExceeded {
            source_duration: "00:00:10".to_string()
        }
    );
    assert!(err.to_string().contains("00:00:10"));
    assert_eq!(err.class(), ErrorClass::BadInput);
}

#[test]
fn test_validate_end_equal_to_source_is_allowed() {
    assert!(ClipRangeValidator::validate("0", "10", 10).is_ok());
}

#[test]
fn test_validate_duration_boundary() {
    let at_cap = ClipRangeValidator::validate("0", "300", 10_000).unwrap();
    assert_eq!(at_cap.duration_seconds(), MAX_CLIP_SECONDS);

    assert!(matches!(
        ClipRangeValidator::validate("0", "301", 10_000),
        Err(ClipError::DurationExceeded { duration: 301, .. })
    ));
}

#[test]
fn test_validate_format_errors_name_the_field() {
    assert_eq!(
        ClipRangeValidator::validate("abc", "00:00:10", 60),
        Err(ClipError::format(TimeField::Start, "abc", FormatIssue::NonNumeric))
    );
    assert_eq!(
        ClipRangeValidator::validate("0", "1:60", 60),
        Err(ClipError::format(TimeField::End, "1:60", FormatIssue::MinuteSecondOverflow))
    );
}

#[test]
fn test_validate_start_is_parsed_before_end() {
    let err = ClipRangeValidator::validate("x", "y", 60).unwrap_err();
    assert!(matches!(err, ClipError::Format { field: TimeField::Start, .. }));
}

#[test]
fn test_validate_check_order() {
    // Ordering beats range and duration
    assert_eq!(
        ClipRangeValidator::validate("5000", "4000", 10),
        Err(ClipError::Ordering)
    );
    // Range beats duration
    assert!(matches!(
        ClipRangeValidator::validate("0", "1000", 10),
        Err(ClipError::RangeExceeded { .. })
    ));
}

#[test]
fn test_validate_large_bare_seconds_fail_later() {
    // No pre-cap on bare seconds: they surface as range or duration errors
    assert!(matches!(
        ClipRangeValidator::validate("9000", "9100", 3600),
        Err(ClipError::RangeExceeded { .. })
    ));
    assert!(ClipRangeValidator::validate("9000", "9100", 10_000).is_ok());
}

#[test]
fn test_validate_range_message_uses_unwrapped_hours() {
    let err = ClipRangeValidator::validate("0", "100000", 90_000).unwrap_err();
    assert_eq!(
        err,
        ClipError::RangeExceeded {
            source_duration: "25:00:00".to_string()
        }
    );
}

#[test]
fn test_validate_is_repeatable() {
    let inputs = [
        ("00:00:05", "00:00:35", 3600),
        ("00:00:10", "00:00:05", 120),
        ("oops", "00:00:05", 120),
    ];
    for (start, end, duration) in inputs {
        assert_eq!(
            ClipRangeValidator::validate(start, end, duration),
            ClipRangeValidator::validate(start, end, duration)
        );
    }
}

#[test]
fn test_precheck_skips_source_length() {
    let range = ClipRangeValidator::precheck("01:00:00", "01:02:00").unwrap();
    assert_eq!(range.start().seconds, 3600);
    assert_eq!(range.duration_seconds(), 120);

    assert_eq!(
        ClipRangeValidator::precheck("10", "5"),
        Err(ClipError::Ordering)
    );
    assert!(matches!(
        ClipRangeValidator::precheck("0", "00:05:01"),
        Err(ClipError::DurationExceeded { .. })
    ));
}

#[test]
fn test_source_policy() {
    let media = MediaRef::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
    let mut info = SourceInfo {
        duration_seconds: 212,
        thumbnail_url: media.fallback_thumbnail_url(),
        is_accessible: true,
        title: None,
    };
    assert!(SourcePolicy::ensure_accessible(&media, &info).is_ok());

    info.is_accessible = false;
    let err = SourcePolicy::ensure_accessible(&media, &info).unwrap_err();
    assert_eq!(err.class(), ErrorClass::SourceUnavailable);
}
