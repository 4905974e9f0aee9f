//! Per-project build options

use std::path::{Path, PathBuf};

/// Configuration handed to the build collaborator for one family
///
/// Output directories are partitioned by family and hinting status:
/// `<output>/<family>/unhinted/{variable-ttf,otf,ttf}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Family name
    pub family_name: String,
    /// Source files, primary first
    pub sources: Vec<PathBuf>,
    /// `<output>/<family>`
    pub family_dir: PathBuf,
    /// Variable font directory
    pub vf_dir: PathBuf,
    /// Static OTF directory
    pub ot_dir: PathBuf,
    /// Static unhinted TTF directory
    pub tt_dir: PathBuf,
    /// Build variable fonts
    pub build_variable: bool,
    /// Build static OTFs
    pub build_otf: bool,
    /// Build web fonts
    pub build_webfont: bool,
    /// Let the build tool autohint TTFs itself
    pub autohint_ttf: bool,
}

impl BuildOptions {
    /// Default layout for a family under `output_root`
    pub fn for_family(
        family: impl Into<String>,
        sources: Vec<PathBuf>,
        output_root: impl AsRef<Path>,
    ) -> Self {
        let family_name = family.into();
        let family_dir = output_root.as_ref().join(&family_name);
        let unhinted = family_dir.join("unhinted");

        Self {
            vf_dir: unhinted.join("variable-ttf"),
            ot_dir: unhinted.join("otf"),
            tt_dir: unhinted.join("ttf"),
            family_dir,
            family_name,
            sources,
            build_variable: true,
            build_otf: true,
            build_webfont: false,
            autohint_ttf: false,
        }
    }

    /// Enable or disable variable fonts
    pub fn with_variable(mut self, enabled: bool) -> Self {
        self.build_variable = enabled;
        self
    }

    /// Enable or disable static OTFs
    pub fn with_otf(mut self, enabled: bool) -> Self {
        self.build_otf = enabled;
        self
    }

    /// Hinted TTF directory
    pub fn hinted_tt_dir(&self) -> PathBuf {
        self.family_dir.join("hinted").join("ttf")
    }

    /// Where the hinted copy of an unhinted TTF goes
    ///
    /// The path below the family directory has `unhinted` replaced by
    /// `hinted`; `None` when the artifact is not an unhinted TTF of this family.
    pub fn hinted_path(&self, unhinted: &Path) -> Option<PathBuf> {
        let is_ttf = unhinted
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("ttf"))
            .unwrap_or(false);
        if !is_ttf || !unhinted.starts_with(&self.tt_dir) {
            return None;
        }

        let relative = unhinted.strip_prefix(&self.family_dir).ok()?;
        let relative = relative.to_str()?.replace("unhinted", "hinted");
        Some(self.family_dir.join(relative))
    }

    /// Build log location
    pub fn log_path(&self) -> PathBuf {
        self.family_dir.join("build.log")
    }
}
