use std::sync::Arc;
use swb::prelude::*;

static DROP_SPAM: FlagDescriptor = FlagDescriptor::fixed("drop-spam", DomainTag::Feature, true);
static DARK_LAUNCH: FlagDescriptor =
    FlagDescriptor::fixed("dark-launch", DomainTag::Feature, false);
static VERBOSE_PAINTS: FlagDescriptor =
    FlagDescriptor::fixed("verbose-paints", DomainTag::Debugging, false);

/// First caller wins; later calls are no-ops since the global is write-once.
fn ensure_installed() {
    let evaluator = Flags::builder()
        .store(SuiteStore::in_memory())
        .arguments(LaunchArguments::empty())
        .build_mode(BuildMode::Debug)
        .build();
    let _ = swb::install(evaluator);
}

#[test]
fn test_global_round_trip() {
    ensure_installed();
    let suite = "global.roundtrip";

    assert!(swb::value(&DROP_SPAM, suite).unwrap());
    assert!(!swb::is_defined(&DROP_SPAM, suite).unwrap());

    swb::set_value(&DROP_SPAM, suite, false).unwrap();
    assert!(!swb::value(&DROP_SPAM, suite).unwrap());
    assert!(swb::is_defined(&DROP_SPAM, suite).unwrap());

    swb::unset(&DROP_SPAM, suite).unwrap();
    assert!(swb::value(&DROP_SPAM, suite).unwrap());
    assert!(!swb::is_defined(&DROP_SPAM, suite).unwrap());
}

#[test]
fn test_second_install_is_rejected() {
    ensure_installed();

    let second = Flags::builder()
        .store(SuiteStore::in_memory())
        .arguments(LaunchArguments::empty())
        .build();

    assert!(matches!(swb::install(second), Err(FlagError::Internal { .. })));
}

#[test]
fn test_all_flags_reports_discovered_descriptors() {
    ensure_installed();
    let suite = "global.catalog";

    swb::value(&VERBOSE_PAINTS, suite).unwrap();
    swb::value(&DARK_LAUNCH, suite).unwrap();

    let keys: Vec<String> =
        swb::all_flags(suite).unwrap().iter().map(|flag| flag.key().to_owned()).collect();
    assert_eq!(keys, vec!["dark-launch", "verbose-paints"]);
}

#[test]
fn test_handles_share_one_registry() {
    ensure_installed();
    let suite = "global.shared";

    let first = swb::flags().unwrap().domain(DomainTag::Feature, suite).unwrap();
    let second = swb::flags().unwrap().domain(DomainTag::Feature, suite).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}
