use proptest::prelude::*;
use serde_json::Value;
use swb_domain::{BuildMode, DomainTag, FlagDefault, FlagDescriptor, LaunchArguments};
use swb_flags::Flags;
use swb_store::SuiteStore;

#[derive(Debug, Clone)]
enum Op {
    Set(bool),
    Unset,
    Read,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![any::<bool>().prop_map(Op::Set), Just(Op::Unset), Just(Op::Read)]
}

fn evaluator(store: SuiteStore) -> Flags {
    Flags::builder()
        .store(store)
        .arguments(LaunchArguments::empty())
        .build_mode(BuildMode::Debug)
        .build()
}

proptest! {
    // The facade tracks a trivial reference model under any interleaving of
    // writes, removals and reads: persisted override if set, default otherwise.
    #[test]
    fn facade_matches_reference_model(
        default in any::<bool>(),
        ops in proptest::collection::vec(op_strategy(), 1..32),
    ) {
        let flags = evaluator(SuiteStore::in_memory());
        let flag = FlagDescriptor::new("model", DomainTag::Feature, FlagDefault::Fixed(default));

        let mut persisted: Option<bool> = None;
        for op in ops {
            match op {
                Op::Set(value) => {
                    flags.set_value(&flag, "model-suite", value).unwrap();
                    persisted = Some(value);
                },
                Op::Unset => {
                    flags.unset(&flag, "model-suite").unwrap();
                    persisted = None;
                },
                Op::Read => {},
            }

            prop_assert_eq!(flags.value(&flag, "model-suite").unwrap(), persisted.unwrap_or(default));
            prop_assert_eq!(flags.is_defined(&flag, "model-suite").unwrap(), persisted.is_some());
        }
    }

    // Whatever JSON an external writer leaves in the store, evaluation stays
    // total: a well-formed boolean is honored, anything else falls back.
    #[test]
    fn arbitrary_persisted_values_never_break_resolution(
        default in any::<bool>(),
        persisted in prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,12}".prop_map(Value::String),
        ],
    ) {
        let store = SuiteStore::in_memory();
        store
            .write("fuzz", "feature-flags", [("x".to_owned(), persisted.clone())].into_iter().collect())
            .unwrap();

        let flags = evaluator(store);
        let flag = FlagDescriptor::new("x", DomainTag::Feature, FlagDefault::Fixed(default));

        let expected = persisted.as_bool().unwrap_or(default);
        prop_assert_eq!(flags.value(&flag, "fuzz").unwrap(), expected);
    }
}
