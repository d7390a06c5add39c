use swb_domain::DomainTag;
use swb_domain::constants::{DEBUG_FLAGS, DISABLE_PREFIX, ENABLE_PREFIX, FEATURE_FLAGS};

#[test]
fn constants_match_wire_strings() {
    assert_eq!(FEATURE_FLAGS, "feature-flags");
    assert_eq!(DEBUG_FLAGS, "debug-flags");
    assert_eq!(ENABLE_PREFIX, "--enable-");
    assert_eq!(DISABLE_PREFIX, "--disable-");
}

#[test]
fn domain_keys_follow_tags() {
    assert_eq!(DomainTag::Feature.domain_key(), FEATURE_FLAGS);
    assert_eq!(DomainTag::Debugging.domain_key(), DEBUG_FLAGS);
}

#[test]
fn tags_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&DomainTag::Feature).unwrap(), "\"feature\"");
    assert_eq!(serde_json::to_string(&DomainTag::Debugging).unwrap(), "\"debugging\"");
    assert_eq!(
        serde_json::from_str::<DomainTag>("\"debugging\"").unwrap(),
        DomainTag::Debugging
    );
}
