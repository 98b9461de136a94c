#![allow(clippy::unwrap_used)]

use super::*;

// ── Day-first policy ──────────────────────────────────────────

#[test]
fn test_day_first_two_digit_year() {
    assert_eq!(normalize("1-12-25").unwrap(), "2025-12-01");
}

#[test]
fn test_day_first_wins_when_ambiguous() {
    // Both readings are valid dates; day-first is the fixed policy.
    assert_eq!(normalize("1-2-2025").unwrap(), "2025-02-01");
    assert_eq!(normalize("3/4/2025").unwrap(), "2025-04-03");
}

#[test]
fn test_month_first_fallback_when_day_first_impossible() {
    assert_eq!(normalize("12-25-2025").unwrap(), "2025-12-25");
    assert_eq!(normalize("12/25/25").unwrap(), "2025-12-25");
}

// ── Separators ────────────────────────────────────────────────

#[test]
fn test_slash_separated() {
    assert_eq!(normalize("01/12/2025").unwrap(), "2025-12-01");
}

#[test]
fn test_dot_separated() {
    assert_eq!(normalize("1.12.2025").unwrap(), "2025-12-01");
}

#[test]
fn test_surrounding_whitespace() {
    assert_eq!(normalize("  1-12-25  ").unwrap(), "2025-12-01");
}

// ── ISO input ─────────────────────────────────────────────────

#[test]
fn test_iso_passes_through() {
    assert_eq!(normalize("2025-12-01").unwrap(), "2025-12-01");
}

#[test]
fn test_iso_unpadded_is_zero_padded() {
    assert_eq!(normalize("2025-3-7").unwrap(), "2025-03-07");
}

// ── Month names ───────────────────────────────────────────────

#[test]
fn test_month_name_forms() {
    assert_eq!(normalize("Dec 1 2025").unwrap(), "2025-12-01");
    assert_eq!(normalize("1 Dec 2025").unwrap(), "2025-12-01");
    assert_eq!(normalize("December 1, 2025").unwrap(), "2025-12-01");
    assert_eq!(normalize("1 December 2025").unwrap(), "2025-12-01");
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn test_normalize_is_idempotent() {
    for input in ["1-12-25", "12/25/2025", "Dec 1 2025", "2025-03-07"] {
        let once = normalize(input).unwrap();
        assert_eq!(normalize(&once).unwrap(), once);
    }
}

// ── Failure ───────────────────────────────────────────────────

#[test]
fn test_invalid_input_carries_original_text() {
    match normalize("not a date") {
        Err(OpError::InvalidDate(original)) => assert_eq!(original, "not a date"),
        other => panic!("expected InvalidDate, got {other:?}"),
    }
}

#[test]
fn test_empty_input_is_invalid() {
    assert!(normalize("").is_err());
    assert!(normalize("   ").is_err());
}

#[test]
fn test_out_of_range_date_is_invalid() {
    assert!(normalize("32-01-2025").is_err());
    assert!(normalize("2025-02-30").is_err());
}
