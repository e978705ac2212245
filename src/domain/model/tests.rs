// Unit tests for domain models

use crate::domain::errors::*;
use crate::domain::model::*;

#[test]
fn test_time_spec_parse() {
    assert_eq!(TimeSpec::parse("00:15:30").unwrap().seconds, 930);
    assert_eq!(TimeSpec::parse("x"), Err(FormatIssue::NonNumeric));
}

#[test]
fn test_time_spec_display() {
    let time = TimeSpec::from_seconds(3723);
    assert_eq!(format!("{}", time), "01:02:03");
    assert_eq!(TimeSpec::from_seconds(90_000).to_string(), "25:00:00");
}

#[test]
fn test_clip_range_creation() {
    let range = ClipRange::from_bounds(TimeSpec::from_seconds(5), TimeSpec::from_seconds(35)).unwrap();

    assert_eq!(range.start().seconds, 5);
    assert_eq!(range.duration_seconds(), 30);
    assert_eq!(range.end().seconds, 35);
    assert_eq!(range.to_string(), "00:00:05 - 00:00:35 (30s)");
}

#[test]
fn test_clip_range_invalid() {
    let ten = TimeSpec::from_seconds(10);
    assert_eq!(ClipRange::from_bounds(ten, ten), Err(ClipError::Ordering));
    assert_eq!(
        ClipRange::from_bounds(ten, TimeSpec::from_seconds(5)),
        Err(ClipError::Ordering)
    );
    assert_eq!(
        ClipRange::from_bounds(TimeSpec::from_seconds(0), TimeSpec::from_seconds(301)),
        Err(ClipError::DurationExceeded { duration: 301, cap: 300 })
    );
}

#[test]
fn test_media_ref_accepts_common_shapes() {
    let cases = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
        "http://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42",
        "https://youtu.be/dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ?si=abc",
        "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "https://www.youtube.com/live/dQw4w9WgXcQ",
        "  https://music.youtube.com/watch?v=dQw4w9WgXcQ  ",
    ];

    for case in cases {
        let media = MediaRef::parse(case).unwrap_or_else(|e| panic!("{}: {}", case, e));
        assert_eq!(media.video_id(), "dQw4w9WgXcQ");
    }
}

#[test]
fn test_media_ref_rejects_other_urls() {
    let cases = [
        "",
        "not a url",
        "ftp://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://vimeo.com/123456",
        "https://www.youtube.com/watch",
        "https://www.youtube.com/watch?v=short",
        "https://www.youtube.com/channel/UCabcdefghijk",
        "https://youtu.be/",
        "https://evil.example/youtube.com/watch?v=dQw4w9WgXcQ",
    ];

    for case in cases {
        assert!(
            matches!(MediaRef::parse(case), Err(ClipError::InvalidMediaRef(_))),
            "{} should be rejected",
            case
        );
    }
}

#[test]
fn test_media_ref_fallback_thumbnail() {
    let media = MediaRef::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
    assert_eq!(
        media.fallback_thumbnail_url(),
        "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
    );
}

#[test]
fn test_clip_token_generate_round_trips_through_parse() {
    let token = ClipToken::generate();
    assert!(token.as_str().starts_with("clip-"));
    assert!(token.as_str().ends_with(".mp4"));
    assert_eq!(ClipToken::parse(token.as_str()).unwrap(), token);
}

#[test]
fn test_clip_token_rejects_foreign_names() {
    for raw in [
        "clip-.mp4",
        "clip-../../etc/passwd.mp4",
        "clip-abc.mov",
        "video-abc.mp4",
        "clip-xyz.mp4",
        "../clip-abc.mp4",
    ] {
        assert!(ClipToken::parse(raw).is_err(), "{} should be rejected", raw);
    }
}
