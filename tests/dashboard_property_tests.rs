//! Selection and merge properties over generated corpora

mod common;

use std::collections::BTreeSet;

use common::Workspace;
use notodash_storage::DashboardConfig;
use proptest::prelude::*;

const STEMS: [&str; 6] = [
    "NotoSansAdlam", "NotoSansTamil", "NotoNastaliqUrdu",
    "NotoSerifThai", "NotoKufiArabic", "NotoSansBalinese",
];

fn family_of(stem: &str) -> String {
    notodash_core::family_name(format!("{}.glyphs", stem)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn repeated_runs_converge_and_never_drop_families(
        present in prop::collection::btree_set(0..STEMS.len(), 1..STEMS.len()),
        denied in prop::collection::btree_set(0..STEMS.len(), 0..3),
        changed in prop::collection::btree_set(0..STEMS.len(), 0..STEMS.len()),
        max_build in 1usize..4,
    ) {
        tokio_test::block_on(async {
            let ws = Workspace::new();
            for index in &present {
                ws.add_source(&format!("{}-MM.glyphs", STEMS[*index]), &format!("{} v1", index));
            }
            let config = DashboardConfig {
                max_build,
                denylist: denied.iter().map(|index| family_of(STEMS[*index])).collect(),
                ..ws.config()
            };
            let buildable: BTreeSet<String> = present
                .difference(&denied)
                .map(|index| family_of(STEMS[*index]))
                .collect();

            // Drain the queue, one capped run at a time
            let mut built = BTreeSet::new();
            loop {
                let summary = ws.dashboard(config.clone()).run().await.unwrap();
                prop_assert!(summary.selected.len() <= max_build);
                if summary.selected.is_empty() {
                    break;
                }
                built.extend(summary.selected);
            }
            prop_assert_eq!(&built, &buildable);

            // Touch some sources; only those are rebuilt and nothing is lost
            let before = ws.snapshot();
            for index in &changed {
                if present.contains(index) {
                    ws.add_source(&format!("{}-MM.glyphs", STEMS[*index]), &format!("{} v2", index));
                }
            }
            let expected: Vec<String> = changed
                .intersection(&present)
                .filter(|index| !denied.contains(index))
                .map(|index| family_of(STEMS[*index]))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let mut rebuilt = Vec::new();
            loop {
                let summary = ws.dashboard(config.clone()).run().await.unwrap();
                if summary.selected.is_empty() {
                    break;
                }
                rebuilt.extend(summary.selected);
            }
            rebuilt.sort();
            prop_assert_eq!(&rebuilt, &expected);

            let after = ws.snapshot();
            prop_assert_eq!(
                after.families().collect::<Vec<_>>(),
                before.families().collect::<Vec<_>>()
            );
            for family in before.families() {
                if !expected.iter().any(|rebuilt| rebuilt == family) {
                    prop_assert_eq!(after.get(family), before.get(family));
                }
            }
            Ok(())
        })?;
    }
}
