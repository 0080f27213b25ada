//! Tests combining scanning and parameter decoding

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn scan_then_decode_command() {
    let token = scan_next("A<!wait=1>B", 0).unwrap();
    let params = decode_parameters(token.parameter_text);
    assert_eq!(token.prefix, Some('!'));
    assert_eq!(token.name, "wait");
    assert_eq!(params.unnamed(), Some("1"));
}

#[test]
fn scan_then_decode_block_with_named_parameters() {
    let token = scan_next("<wave amp=\"1.5\" freq=2>text", 0).unwrap();
    let params = decode_parameters(token.parameter_text);
    assert_eq!(params.get("amp"), Some("1.5"));
    assert_eq!(params.get("freq"), Some("2"));
    assert_eq!(params.unnamed(), None);
}

#[test]
fn literal_angle_brackets_are_skipped() {
    let text = "1 < 2 <b>bold</b> 3 > 2";
    let spans: Vec<_> = TagScanner::new(text).map(|t| t.span).collect();
    assert_eq!(spans, vec!["<b>", "</b>"]);
}

#[test]
fn comparison_then_tag_on_same_line() {
    // "< 2 and 3 >" is a candidate with prefix ' ' and name "2"
    let text = "x < 2 and 3 >";
    let token = scan_next(text, 0).unwrap();
    assert_eq!(token.prefix, Some(' '));
    assert_eq!(token.name, "2");
}

#[test]
fn token_spans_slice_the_source() {
    let text = "ab<?event id=7>cd";
    let token = scan_next(text, 0).unwrap();
    assert_eq!(&text[token.byte_range()], token.span);
    assert_eq!(token.len(), token.span.len());
}

#[test]
fn close_keywords() {
    let tokens: Vec<_> = TagScanner::new("</></all></wave>").collect();
    assert!(tokens[0].closes_most_recent());
    assert!(tokens[1].closes_all());
    assert!(!tokens[2].closes_all());
    assert_eq!(tokens[1].name, CLOSE_ALL_KEYWORD);
}

#[test]
fn tag_kinds() {
    let tokens: Vec<_> = TagScanner::new("<a></a>").map(|t| t.kind).collect();
    assert_eq!(tokens, vec![TagKind::Open, TagKind::Close]);
}
