#![allow(clippy::unwrap_used)]

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_keeps_short_names() {
    assert_eq!(truncate("Hotel", 10), "Hotel");
    assert_eq!(truncate("Hotel", 5), "Hotel");
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_long_name() {
    assert_eq!(truncate("Snorkeling at Nusa Penida", 10), "Snorkelin…");
}

#[test]
fn test_truncate_edge_widths() {
    assert_eq!(truncate("Hotel", 0), "");
    assert_eq!(truncate("Hotel", 1), "…");
    assert_eq!(truncate("H", 1), "H");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("Pura Tanah Lot 🌅🌅", 15), "Pura Tanah Lot…");
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_follows_cursor_past_page() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..4 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 4);
    assert_eq!(scroll, 2);
}

#[test]
fn test_scroll_down_stops_at_last_row() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
    assert_eq!(scroll, 0);
}

#[test]
fn test_scroll_up_pulls_scroll_back() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));

    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_jump_to_ends() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));

    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));

    scroll_to_bottom(&mut index, &mut scroll, 0, 5);
    assert_eq!((index, scroll), (0, 0));
}
