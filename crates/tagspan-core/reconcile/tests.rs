//! Reconciler tests

use super::*;
use crate::tags::{TagIdentity, TagSpan};
use pretty_assertions::assert_eq;

#[test]
fn identity_mapping_changes_nothing() {
    let mut spans = [
        TagSpan::closed(0, 2, 0),
        TagSpan::open(1, 0),
        TagSpan::closed(3, 5, 1),
    ];
    let original = spans;
    let report = reconcile_spans(spans.iter_mut(), &IdentityMapping::new(5));
    assert_eq!(spans, original);
    assert_eq!(report.moved, 0);
    assert_eq!(report.spans, 3);
}

#[test]
fn end_at_text_length_lands_on_rendered_length() {
    let mut spans = [TagSpan::closed(2, 5, 0)];
    let report = reconcile_spans(spans.iter_mut(), &IdentityMapping::new(5));
    assert_eq!(spans[0], TagSpan::closed(2, 5, 0));
    assert_eq!(report.clamped, 1);
}

#[test]
fn ligature_collapses_positions() {
    // "ffi x" -> "\u{FB03} x"
    let origins: Vec<usize> = vec![0, 3, 4];
    let mut spans = [TagSpan::closed(0, 1, 0), TagSpan::closed(3, 4, 0)];
    reconcile_spans(spans.iter_mut(), &origins);
    assert_eq!(spans, [TagSpan::closed(0, 1, 0), TagSpan::closed(1, 2, 0)]);
}

#[test]
fn inserted_characters_shift_later_spans() {
    // soft hyphen inserted before clean position 2 of "abcd"
    let origins: [usize; 5] = [0, 1, 2, 2, 3];
    let mut spans = [TagSpan::closed(2, 3, 0), TagSpan::open(3, 0)];
    let report = reconcile_spans(spans.iter_mut(), &origins[..]);
    assert_eq!(spans, [TagSpan::closed(2, 4, 0), TagSpan::open(4, 0)]);
    assert_eq!(report.moved, 2);
}

#[test]
fn open_ends_stay_open() {
    let mut spans = [TagSpan::open(2, 0)];
    reconcile_spans(spans.iter_mut(), &MappingFn::new(8, |i| i / 2));
    assert_eq!(spans[0], TagSpan::open(4, 0));
}

#[test]
fn targets_past_the_rendered_text_clamp() {
    let mut spans = [TagSpan::closed(1, 9, 0), TagSpan::open(7, 0)];
    let report = reconcile_spans(spans.iter_mut(), &IdentityMapping::new(3));
    assert_eq!(spans, [TagSpan::closed(1, 3, 0), TagSpan::open(3, 0)]);
    assert_eq!(report.clamped, 2);
}

#[test]
fn empty_rendering_clamps_everything_to_zero() {
    let mut spans = [TagSpan::closed(1, 2, 0)];
    reconcile_spans(spans.iter_mut(), &IdentityMapping::new(0));
    assert_eq!(spans[0], TagSpan::closed(0, 0, 0));
}

#[test]
fn relevel_bumps_collapsed_ties() {
    let mut spans = [
        TagSpan::open(1, 0),
        TagSpan::open(1, 0),
        TagSpan::open(1, 1),
        TagSpan::open(2, 0),
    ];
    let bumped = relevel_orders(spans.iter_mut());
    assert_eq!(bumped, 2);
    assert_eq!(
        spans.map(|s| s.key()),
        [
            SpanKey::new(1, 0),
            SpanKey::new(1, 1),
            SpanKey::new(1, 2),
            SpanKey::new(2, 0),
        ]
    );
}

#[test]
fn relevel_keeps_unique_orders() {
    let mut spans = [TagSpan::open(0, 0), TagSpan::open(0, 4), TagSpan::open(1, 0)];
    assert_eq!(relevel_orders(spans.iter_mut()), 0);
    assert_eq!(spans[1].order_at_index, 4);
}

#[test]
fn lists_reconcile_and_relevel_per_category() {
    let wave = TagIdentity::bare("wave", None);
    let wait = TagIdentity::bare("wait", Some('!'));
    let mut lists = vec![
        vec![
            TagEntry::new(TagSpan::open(1, 0), wave.clone()),
            TagEntry::new(TagSpan::open(2, 0), wave),
        ],
        vec![TagEntry::new(TagSpan::closed(3, 4, 0), wait)],
    ];

    // the renderer drops clean position 1
    let origins: Vec<usize> = vec![0, 2, 3, 4];
    let report = reconcile_lists(&mut lists, &origins);

    assert_eq!(report.spans, 3);
    assert_eq!(lists[0][0].span, TagSpan::open(1, 0));
    assert_eq!(lists[0][1].span, TagSpan::open(1, 1));
    assert_eq!(lists[1][0].span, TagSpan::closed(2, 3, 0));
}

#[test]
fn mapping_fn_debug_shows_length() {
    let mapping = MappingFn::new(3, |i| i);
    assert_eq!(mapping.rendered_len(), 3);
    assert!(format!("{mapping:?}").contains('3'));
}
