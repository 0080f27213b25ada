//! Tests for category policies and the built-in tag set

use super::*;
use crate::tags::{TagIdentity, TagParameters};

/// Policy that only offers open validation
struct OpenOnly;

impl CategoryPolicy for OpenOnly {
    fn name(&self) -> &str {
        "open-only"
    }

    fn capabilities(&self) -> PolicyCapabilities {
        PolicyCapabilities::VALIDATE_OPEN
    }

    fn validate_open(&self, _tag: &TagIdentity) -> Option<SpanClosing> {
        Some(SpanClosing::UntilClosed)
    }

    fn validate_close(&self, _tag: &TagIdentity) -> bool {
        true
    }
}

fn effects() -> TagSet {
    TagSet::new("effects")
        .with_block("wave")
        .with_block("shake")
        .with_point("pop")
}

#[test]
fn span_closing_forced_end() {
    assert_eq!(SpanClosing::UntilClosed.forced_end(4), None);
    assert_eq!(SpanClosing::POINT.forced_end(4), Some(5));
    assert_eq!(SpanClosing::Fixed(3).forced_end(0), Some(3));
}

#[test]
fn default_capabilities_are_full() {
    struct Both;
    impl CategoryPolicy for Both {
        fn name(&self) -> &str {
            "both"
        }
        fn validate_open(&self, _tag: &TagIdentity) -> Option<SpanClosing> {
            None
        }
        fn validate_close(&self, _tag: &TagIdentity) -> bool {
            false
        }
    }
    assert_eq!(Both.capabilities(), PolicyCapabilities::all());
    assert_eq!(
        OpenOnly.capabilities(),
        PolicyCapabilities::VALIDATE_OPEN
    );
}

#[test]
fn boxed_policy_delegates() {
    let boxed: Box<dyn CategoryPolicy> = Box::new(OpenOnly);
    assert_eq!(boxed.name(), "open-only");
    assert!(!boxed
        .capabilities()
        .contains(PolicyCapabilities::VALIDATE_CLOSE));
}

#[test]
fn tag_set_accepts_known_names() {
    let set = effects();
    assert_eq!(
        set.validate_open(&TagIdentity::bare("wave", None)),
        Some(SpanClosing::UntilClosed)
    );
    assert_eq!(
        set.validate_open(&TagIdentity::bare("pop", None)),
        Some(SpanClosing::POINT)
    );
    assert_eq!(set.validate_open(&TagIdentity::bare("bold", None)), None);
}

#[test]
fn tag_set_closes_only_block_tags() {
    let set = effects();
    assert!(set.validate_close(&TagIdentity::bare("wave", None)));
    assert!(!set.validate_close(&TagIdentity::bare("pop", None)));
    assert!(!set.validate_close(&TagIdentity::bare("bold", None)));
}

#[test]
fn tag_set_capabilities_follow_definitions() {
    assert_eq!(effects().capabilities(), PolicyCapabilities::all());
    let points = TagSet::new("commands").with_point("wait");
    assert_eq!(points.capabilities(), PolicyCapabilities::VALIDATE_OPEN);
}

#[test]
fn tag_set_validator_checks_parameters() {
    let set = effects().with_validator("wave", |params| params.contains("amp"));
    let with_amp: TagParameters = [("amp", "2")].into_iter().collect();
    assert!(set
        .validate_open(&TagIdentity::new("wave", None, with_amp))
        .is_some());
    assert!(set
        .validate_open(&TagIdentity::bare("wave", None))
        .is_none());
}

#[test]
fn validator_for_unknown_tag_is_ignored() {
    let set = effects().with_validator("missing", |_| false);
    assert!(!set.contains("missing"));
    assert_eq!(set.len(), 3);
}

#[test]
fn define_rejects_duplicates() {
    let mut set = effects();
    assert!(set
        .define("glow", TagDefinition::new(SpanClosing::UntilClosed))
        .is_ok());
    let err = set
        .define("glow", TagDefinition::new(SpanClosing::POINT))
        .unwrap_err();
    assert!(err.to_string().contains("glow"));
    assert_eq!(
        set.definition("glow").map(TagDefinition::closing),
        Some(SpanClosing::UntilClosed)
    );
}

#[test]
fn remove_and_listing() {
    let mut set = effects();
    assert!(set.remove("shake").is_some());
    assert!(set.remove("shake").is_none());
    assert_eq!(set.tag_names(), vec!["pop", "wave"]);
    assert!(!set.is_empty());

    let debug = format!("{set:?}");
    assert!(debug.contains("effects"));
    assert!(debug.contains("wave"));
}
