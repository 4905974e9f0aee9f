//! Property-based tests for family name derivation and output categorisation

use notodash_core::{categorize_outputs, family_name, OutputCategory};
use proptest::prelude::*;

// Capitalised words such as "Sans", "Devanagari"
fn word_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,10}"
}

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word_strategy(), 1..5)
}

proptest! {
    /// CamelCase stems with a multi-master suffix split back into their words
    #[test]
    fn prop_camel_case_words_are_split(words in words_strategy(), dashed in any::<bool>()) {
        let suffix = if dashed { "-MM" } else { "MM" };
        let filename = format!("src/Noto{}{}.glyphs", words.concat(), suffix);

        let family = family_name(&filename).unwrap();
        prop_assert_eq!(family, format!("Noto {}", words.join(" ")));
    }

    /// Directory and extension never influence the family name
    #[test]
    fn prop_directory_and_extension_ignored(
        words in words_strategy(),
        dir in "[a-z]{1,8}",
        ext in prop_oneof![Just("glyphs"), Just("designspace")],
    ) {
        let stem = format!("Noto{}-MM", words.concat());
        let nested = format!("src/{}/{}.{}", dir, stem, ext);
        let flat = format!("{}.glyphs", stem);

        prop_assert_eq!(family_name(&nested).unwrap(), family_name(&flat).unwrap());
    }

    /// Every categorised entry keeps its path and a display name equal to the base name
    #[test]
    fn prop_categorised_entries_keep_base_name(
        names in prop::collection::vec("[A-Za-z]{1,12}", 1..8),
    ) {
        let paths: Vec<String> = names
            .iter()
            .map(|name| format!("Noto Sans/hinted/ttf/{}.ttf", name))
            .collect();

        let outputs = categorize_outputs(paths.clone());
        let hinted = &outputs[&OutputCategory::Hinted];

        for entry in hinted {
            prop_assert!(paths.contains(&entry.path));
            prop_assert!(entry.path.ends_with(&entry.display));
            prop_assert!(!entry.display.contains('/'));
        }
        let mut sorted = hinted.clone();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));
        prop_assert_eq!(hinted, &sorted);
    }
}

#[test]
fn test_known_families() {
    let cases = [
        ("src/NotoSansFooBar-MM.glyphs", "Noto Sans Foo Bar"),
        ("src/NotoSerifCJK/NotoSerifCJK-MM.designspace", "Noto Serif CJK"),
        ("src/NotoNastaliqUrdu-MM.glyphs", "Noto Nastaliq Urdu"),
        ("src/NotoSansDevanagari.glyphs", "Noto Sans Devanagari"),
    ];

    for (source, expected) in cases {
        assert_eq!(family_name(source).unwrap(), expected, "source {}", source);
    }
}
