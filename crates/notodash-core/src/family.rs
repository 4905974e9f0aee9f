//! Family name derivation and output path classification

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CoreError, Result};

static CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid case boundary regex"));

static MULTI_MASTER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?MM$").expect("valid multi-master suffix regex"));

/// Derive the human-readable family name from a source file path
///
/// The extension and directories are dropped, a space is inserted at every
/// lowercase-to-uppercase boundary and a trailing multi-master marker
/// (`-MM` or `MM`) is removed.
///
/// ```
/// use notodash_core::family_name;
///
/// assert_eq!(family_name("NotoSerifCJK-MM.designspace").unwrap(), "Noto Serif CJK");
/// ```
pub fn family_name<P: AsRef<Path>>(source: P) -> Result<String> {
    let source = source.as_ref();
    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| CoreError::InvalidSource {
            path: source.to_path_buf(),
        })?;

    let spaced = CASE_BOUNDARY.replace_all(stem, "${1} ${2}");
    let family = MULTI_MASTER_SUFFIX.replace(&spaced, "");
    let family = family.trim_end();

    if family.is_empty() {
        return Err(CoreError::InvalidSource {
            path: source.to_path_buf(),
        });
    }

    Ok(family.to_string())
}

/// Whether an output path should be handed to the QA checker
///
/// Only unhinted static TrueType and unhinted variable fonts are checked.
pub fn is_qa_eligible(relative_path: &str) -> bool {
    relative_path.contains("unhinted/ttf") || relative_path.contains("unhinted/variable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_source() {
        assert_eq!(
            family_name("src/NotoSansFooBar-MM.glyphs").unwrap(),
            "Noto Sans Foo Bar"
        );
    }

    #[test]
    fn test_designspace_source() {
        assert_eq!(
            family_name("src/NotoSerifCJK/NotoSerifCJK-MM.designspace").unwrap(),
            "Noto Serif CJK"
        );
    }

    #[test]
    fn test_suffix_without_dash() {
        assert_eq!(family_name("NotoSansItalicMM.glyphs").unwrap(), "Noto Sans Italic");
    }

    #[test]
    fn test_no_suffix() {
        assert_eq!(family_name("NotoNastaliqUrdu.glyphs").unwrap(), "Noto Nastaliq Urdu");
    }

    #[test]
    fn test_empty_stem_rejected() {
        assert!(matches!(
            family_name(""),
            Err(CoreError::InvalidSource { .. })
        ));
        assert!(family_name("-MM.glyphs").is_err());
    }

    #[test]
    fn test_qa_eligibility() {
        assert!(is_qa_eligible("Noto Sans/unhinted/ttf/NotoSans-Regular.ttf"));
        assert!(is_qa_eligible("Noto Sans/unhinted/variable-ttf/NotoSans[wght].ttf"));
        assert!(!is_qa_eligible("Noto Sans/unhinted/otf/NotoSans-Regular.otf"));
        assert!(!is_qa_eligible("Noto Sans/hinted/ttf/NotoSans-Regular.ttf"));
    }
}
