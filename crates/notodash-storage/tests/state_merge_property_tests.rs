use std::collections::BTreeSet;

use notodash_core::{BuildResult, PersistedState};
use proptest::prelude::*;

fn family() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Noto Sans", "Noto Serif", "Noto Sans Adlam", "Noto Nastaliq Urdu",
        "Noto Sans Tamil", "Noto Serif CJK", "Noto Sans Mono",
    ])
    .prop_map(str::to_string)
}

fn result() -> impl Strategy<Value = BuildResult> {
    (family(), "[a-f0-9]{7}", any::<bool>(), prop::collection::vec("[A-Za-z]{1,8}", 0..3)).prop_map(
        |(family, id, failed, names)| {
            let outputs: Vec<String> = names
                .iter()
                .map(|name| format!("{}/unhinted/ttf/{}.ttf", family, name))
                .collect();
            let result = BuildResult::new(family.as_str())
                .with_fingerprint(Some(format!("{} (Change, 2024-01-01)", id)))
                .with_outputs(outputs);
            if failed {
                result.with_error("build failed")
            } else {
                result
            }
        },
    )
}

proptest! {
    #[test]
    fn merge_keeps_unrelated_entries_identical(
        before in prop::collection::vec(result(), 0..6),
        rebuilt in prop::collection::vec(result(), 0..4),
    ) {
        let mut state = PersistedState::new();
        state.merge(before);
        let original = state.clone();

        state.merge(rebuilt.clone());

        let rebuilt_families: BTreeSet<&str> = rebuilt.iter().map(|r| r.family.as_str()).collect();
        for (family, entry) in original.entries() {
            if !rebuilt_families.contains(family) {
                prop_assert_eq!(
                    serde_json::to_string(&state.entry(family).unwrap()).unwrap(),
                    serde_json::to_string(&entry).unwrap()
                );
            }
        }

        let expected_keys: BTreeSet<&str> = original.families().chain(rebuilt_families.iter().copied()).collect();
        prop_assert_eq!(state.families().collect::<BTreeSet<_>>(), expected_keys);
    }

    #[test]
    fn rebuilt_entries_are_replaced_wholesale(
        before in prop::collection::vec(result(), 0..6),
        rebuilt in result(),
    ) {
        let mut state = PersistedState::new();
        state.merge(before);
        state.record(rebuilt.clone());
        prop_assert_eq!(state.get(&rebuilt.family), Some(&rebuilt));
    }
}
