#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    // Japanese characters are multi-byte UTF-8
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

#[test]
fn test_truncate_emoji() {
    assert_eq!(truncate("🎉🎊🎈🎁", 3), "🎉🎊…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_mixed_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

#[test]
fn test_truncate_two_chars() {
    assert_eq!(truncate("hello", 2), "h…");
}

#[test]
fn test_truncate_single_char_string() {
    assert_eq!(truncate("a", 1), "a");
    assert_eq!(truncate("a", 5), "a");
}

#[test]
fn test_truncate_max_one_with_long_string() {
    // max=1 should always produce "…" for strings longer than 1
    assert_eq!(truncate("ab", 1), "…");
    assert_eq!(truncate("abc", 1), "…");
}

// ── format_amount ──────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
}

#[test]
fn test_format_amount_no_commas() {
    assert_eq!(format_amount(dec!(999.99)), "$999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-$42.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000.00)), "$10,000,000.00");
}

#[test]
fn test_format_amount_rounds_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
}

#[test]
fn test_format_amount_negative_large() {
    assert_eq!(format_amount(dec!(-99999.01)), "-$99,999.01");
}

#[test]
fn test_format_amount_single_digit() {
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

// ── bars ───────────────────────────────────────────────────

#[test]
fn test_bar_scales_to_max() {
    assert_eq!(bar(dec!(100), dec!(100), 10), "██████████");
    assert_eq!(bar(dec!(50), dec!(100), 10), "█████");
}

#[test]
fn test_bar_small_value_still_visible() {
    assert_eq!(bar(dec!(1), dec!(1000), 10), "█");
}

#[test]
fn test_bar_empty_for_zero() {
    assert_eq!(bar(dec!(0), dec!(100), 10), "");
    assert_eq!(bar(dec!(0), dec!(0), 10), "");
}

#[test]
fn test_bar_near_decimal_limits() {
    assert_eq!(bar(Decimal::MAX, Decimal::MAX, 24).chars().count(), 24);
    assert_eq!(bar(Decimal::MAX, dec!(0.001), 5).chars().count(), 5);
    // roughly 0.38 of Decimal::MAX
    let large = Decimal::from_i128_with_scale(30_000_000_000_000_000_000_000_000_000, 0);
    assert_eq!(bar(large, Decimal::MAX, 10).chars().count(), 4);
}

#[test]
fn test_ratio_near_decimal_limits() {
    assert_eq!(ratio(Decimal::MAX, dec!(0.0001)), 1.0);
    assert_eq!(ratio(Decimal::MAX, Decimal::MAX), 1.0);
}

#[test]
fn test_ratio_clamps() {
    assert_eq!(ratio(dec!(50), dec!(200)), 0.25);
    assert_eq!(ratio(dec!(300), dec!(200)), 1.0);
    assert_eq!(ratio(dec!(10), dec!(0)), 1.0);
    assert_eq!(ratio(dec!(0), dec!(0)), 0.0);
}

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(0.5, 4), "[██░░]");
    assert_eq!(progress_bar(1.0, 4), "[████]");
    assert_eq!(progress_bar(0.0, 3), "[░░░]");
}

// ── scrolling ──────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 2);
    scroll_down(&mut index, &mut scroll, 5, 3);
    assert_eq!((index, scroll), (4, 2));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (8, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}
