//! Preprocessing pass tests

use super::*;
use crate::{
    parser::config::{StyleDefinition, StyleSheet},
    plugin::TagSet,
    tags::TagSpan,
    utils::PositionEncoding,
};
use pretty_assertions::assert_eq;

struct Fixture {
    preprocessor: TextPreprocessor,
    effects: CategoryId,
    commands: CategoryId,
    events: CategoryId,
}

fn fixture(config: PreprocessorConfig) -> Fixture {
    let mut preprocessor = TextPreprocessor::with_config(config).unwrap();
    let effects = preprocessor
        .register(
            None,
            TagSet::new("effects")
                .with_block("a")
                .with_block("b")
                .with_block("c"),
        )
        .unwrap();
    let commands = preprocessor
        .register(Some('!'), TagSet::new("commands").with_point("wait"))
        .unwrap();
    let events = preprocessor
        .register(Some('?'), TagSet::new("events").with_point("event"))
        .unwrap();
    Fixture {
        preprocessor,
        effects,
        commands,
        events,
    }
}

fn default_fixture() -> Fixture {
    fixture(PreprocessorConfig::default())
}

fn spans(output: &ProcessedText, category: CategoryId) -> Vec<(String, TagSpan)> {
    output
        .tags(category)
        .iter()
        .map(|e| (e.identity.name().to_string(), e.span))
        .collect()
}

fn named(name: &str, span: TagSpan) -> (String, TagSpan) {
    (name.to_string(), span)
}

#[test]
fn commands_and_events_are_stripped() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("A<!wait=1>B<?event>C");

    assert_eq!(output.clean_text(), "ABC");
    assert_eq!(output.clean_len(), 3);
    assert_eq!(spans(&output, f.commands), vec![named("wait", TagSpan::closed(1, 2, 0))]);
    assert_eq!(spans(&output, f.events), vec![named("event", TagSpan::closed(2, 3, 0))]);
    assert_eq!(
        output.tags(f.commands)[0].identity.parameters().unnamed(),
        Some("1")
    );
    assert_eq!(output.tag_count(), 2);
}

#[test]
fn order_restarts_after_literal_text() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<a><b>X<c>");

    assert_eq!(output.clean_text(), "X");
    assert_eq!(
        spans(&output, f.effects),
        vec![
            named("a", TagSpan::open(0, 0)),
            named("b", TagSpan::open(0, 1)),
            named("c", TagSpan::open(1, 0)),
        ]
    );
}

#[test]
fn rejected_tags_stay_and_keep_the_order_running() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<a><u><b>");

    assert_eq!(output.clean_text(), "<u>");
    assert_eq!(
        spans(&output, f.effects),
        vec![named("a", TagSpan::open(0, 0)), named("b", TagSpan::open(3, 1))]
    );
}

#[test]
fn named_close_only_closes_its_name() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<a><b></a><b>");

    assert_eq!(output.clean_text(), "");
    assert_eq!(
        spans(&output, f.effects),
        vec![
            named("a", TagSpan::closed(0, 0, 0)),
            named("b", TagSpan::open(0, 1)),
            named("b", TagSpan::open(0, 3)),
        ]
    );
}

#[test]
fn most_recent_keyword_closes_latest_tag() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<a>x<b>y</>z");

    assert_eq!(output.clean_text(), "xyz");
    assert_eq!(
        spans(&output, f.effects),
        vec![named("a", TagSpan::open(0, 0)), named("b", TagSpan::closed(1, 2, 0))]
    );
}

#[test]
fn close_all_keyword_closes_everything() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<a>x<b>y</all>z");

    assert_eq!(output.clean_text(), "xyz");
    assert_eq!(
        spans(&output, f.effects),
        vec![named("a", TagSpan::closed(0, 2, 0)), named("b", TagSpan::closed(1, 2, 0))]
    );
}

#[test]
fn unmatched_close_stays_literal() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("x</a>y");
    assert_eq!(output.clean_text(), "x</a>y");
    assert!(output.tags(f.effects).is_empty());
}

#[test]
fn unregistered_prefix_and_malformed_tags_stay_literal() {
    let mut f = default_fixture();
    let raw = "1 < 2 <#x> <a";
    let output = f.preprocessor.process(raw);
    assert_eq!(output.clean_text(), raw);
    assert_eq!(output.tag_count(), 0);
}

#[test]
fn positions_follow_the_configured_unit() {
    let raw = "\u{1F600}<!wait>a";
    for (encoding, expected) in [
        (PositionEncoding::Utf16, 2),
        (PositionEncoding::Chars, 1),
        (PositionEncoding::Bytes, 4),
    ] {
        let mut f = fixture(PreprocessorConfig::default().with_position_encoding(encoding));
        let output = f.preprocessor.process(raw);
        assert_eq!(output.tags(f.commands)[0].span.start_index, expected);
        assert_eq!(output.clean_len(), expected + 1);
    }
}

#[test]
fn verbatim_region_is_literal() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<noparse><a></noparse><a>");

    assert_eq!(output.clean_text(), "<a>");
    assert_eq!(spans(&output, f.effects), vec![named("a", TagSpan::open(3, 0))]);
}

#[test]
fn verbatim_markers_can_be_emitted() {
    let mut f = fixture(PreprocessorConfig::default().with_verbatim_markers(true));
    let output = f.preprocessor.process("<noparse><a></noparse><a>");

    assert_eq!(output.clean_text(), "<noparse><a></noparse>");
    assert_eq!(spans(&output, f.effects), vec![named("a", TagSpan::open(22, 0))]);
}

#[test]
fn unterminated_verbatim_runs_to_the_end() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("x<noparse><a>y</a>");
    assert_eq!(output.clean_text(), "x<a>y</a>");
    assert_eq!(output.tag_count(), 0);
}

#[test]
fn style_macro_expands_before_dispatch() {
    let sheet = StyleSheet::new().with_style("loud", StyleDefinition::new("<a><b>", "</b></a>"));
    let mut f = fixture(PreprocessorConfig::default().with_style_sheet(sheet));
    let output = f.preprocessor.process("x<style=loud>y</style>z");

    assert_eq!(output.clean_text(), "xyz");
    assert_eq!(
        spans(&output, f.effects),
        vec![named("a", TagSpan::closed(1, 2, 0)), named("b", TagSpan::closed(1, 2, 1))]
    );
}

#[test]
fn unknown_style_stays_literal() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<style=nope>x</style>");
    assert_eq!(output.clean_text(), "<style=nope>x</style>");
}

#[test]
fn self_referencing_style_is_bounded() {
    let sheet = StyleSheet::new().with_style("again", StyleDefinition::new("<style=again>", ""));
    let config = PreprocessorConfig::default()
        .with_style_sheet(sheet)
        .with_max_style_expansions(3);
    let mut f = fixture(config);
    let output = f.preprocessor.process("<style=again>x");
    assert_eq!(output.clean_text(), "<style=again>x");
}

#[test]
fn every_pass_starts_fresh() {
    let mut f = default_fixture();
    let first = f.preprocessor.process("<a>x");
    let second = f.preprocessor.process("y<b>");

    assert_eq!(first.tags(f.effects).len(), 1);
    assert_eq!(spans(&second, f.effects), vec![named("b", TagSpan::open(1, 0))]);
    assert!(f.preprocessor.multiplexer().matchers().iter().all(|m| m.entries().is_empty()));
}

#[test]
fn categories_iterate_in_registration_order() {
    let mut f = default_fixture();
    let output = f.preprocessor.process("<a><!wait>");
    let counts: Vec<_> = output.categories().map(|(id, tags)| (id, tags.len())).collect();
    assert_eq!(counts, vec![(f.effects, 1), (f.commands, 1), (f.events, 0)]);
    assert!(output.tags(CategoryId::from_index(9)).is_empty());

    let (clean, tags) = output.into_parts();
    assert_eq!(clean, "");
    assert_eq!(tags.len(), 3);
}

#[test]
fn invalid_config_is_rejected() {
    let config = PreprocessorConfig::default().with_verbatim_tag(Some(""));
    assert!(TextPreprocessor::with_config(config).is_err());
}
