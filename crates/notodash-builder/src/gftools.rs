//! Build collaborator: `gftools builder`

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use notodash_process::{ProcessConfig, ProcessManager};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{BuildError, Result};
use crate::options::BuildOptions;

/// Allowance for filesystems with coarse modification times
const MTIME_SLACK: Duration = Duration::from_secs(2);

/// Which half of a project build to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Variable fonts into `vf_dir`
    Variable,
    /// Static TTFs (and OTFs when enabled) into `tt_dir` / `ot_dir`
    Static,
}

impl BuildStage {
    /// Lower-case stage name
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStage::Variable => "variable",
            BuildStage::Static => "static",
        }
    }
}

/// What one stage produced
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    /// Produced font files
    pub outputs: Vec<PathBuf>,
    /// Captured tool output
    pub transcript: String,
}

/// Compiles font sources
#[async_trait]
pub trait FontBuilder: Send + Sync {
    /// Run one stage of the build and report the files it produced
    async fn build(&self, options: &BuildOptions, stage: BuildStage) -> Result<StageReport>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GftoolsConfig {
    family_name: String,
    sources: Vec<String>,
    vf_dir: String,
    ot_dir: String,
    tt_dir: String,
    build_static: bool,
    build_variable: bool,
    #[serde(rename = "buildOTF")]
    build_otf: bool,
    #[serde(rename = "buildTTF")]
    build_ttf: bool,
    build_webfont: bool,
    #[serde(rename = "autohintTTF")]
    autohint_ttf: bool,
}

/// Runs `gftools builder <config.yaml>`
#[derive(Debug, Clone)]
pub struct GftoolsBuilder {
    program: String,
    timeout: Duration,
    process: ProcessManager,
}

impl GftoolsBuilder {
    /// Use `gftools` from `PATH`
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("gftools", timeout)
    }

    /// Use a specific executable
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            process: ProcessManager::new(),
        }
    }

    /// Where the stage configuration is written
    pub fn config_path(options: &BuildOptions) -> PathBuf {
        options.family_dir.join("build-config.yaml")
    }

    /// Render the gftools configuration for one stage
    ///
    /// gftools resolves paths against the configuration file, so every path
    /// is made absolute.
    pub fn stage_config(options: &BuildOptions, stage: BuildStage) -> Result<String> {
        let config = GftoolsConfig {
            family_name: options.family_name.clone(),
            sources: options
                .sources
                .iter()
                .map(|source| absolute(source).map(|p| p.display().to_string()))
                .collect::<Result<_>>()?,
            vf_dir: absolute(&options.vf_dir)?.display().to_string(),
            ot_dir: absolute(&options.ot_dir)?.display().to_string(),
            tt_dir: absolute(&options.tt_dir)?.display().to_string(),
            build_static: stage == BuildStage::Static,
            build_variable: stage == BuildStage::Variable,
            build_otf: stage == BuildStage::Static && options.build_otf,
            build_ttf: stage == BuildStage::Static,
            build_webfont: options.build_webfont,
            autohint_ttf: options.autohint_ttf,
        };
        Ok(serde_yaml::to_string(&config)?)
    }

    /// Directories a stage writes into
    pub fn stage_dirs(options: &BuildOptions, stage: BuildStage) -> Vec<&Path> {
        match stage {
            BuildStage::Variable => vec![options.vf_dir.as_path()],
            BuildStage::Static if options.build_otf => {
                vec![options.tt_dir.as_path(), options.ot_dir.as_path()]
            }
            BuildStage::Static => vec![options.tt_dir.as_path()],
        }
    }
}

#[async_trait]
impl FontBuilder for GftoolsBuilder {
    async fn build(&self, options: &BuildOptions, stage: BuildStage) -> Result<StageReport> {
        let config_path = Self::config_path(options);
        let config = Self::stage_config(options, stage)?;
        tokio::fs::create_dir_all(&options.family_dir)
            .await
            .map_err(|e| BuildError::io(&options.family_dir, e))?;
        tokio::fs::write(&config_path, config)
            .await
            .map_err(|e| BuildError::io(&config_path, e))?;

        debug!(
            family = %options.family_name,
            stage = stage.as_str(),
            config = %config_path.display(),
            "Running gftools builder"
        );

        let started = SystemTime::now();
        let output = self
            .process
            .run(
                ProcessConfig::new(&self.program)
                    .arg("builder")
                    .arg(config_path.display().to_string())
                    .timeout(self.timeout),
            )
            .await?
            .check()?;

        let outputs = collect_fonts(&Self::stage_dirs(options, stage), started);
        info!(
            family = %options.family_name,
            stage = stage.as_str(),
            count = outputs.len(),
            "Build stage finished"
        );

        Ok(StageReport {
            outputs,
            transcript: output.transcript(),
        })
    }
}

/// Font files under `dirs` modified at or after `since`, sorted
pub fn collect_fonts(dirs: &[&Path], since: SystemTime) -> Vec<PathBuf> {
    let threshold = since.checked_sub(MTIME_SLACK).unwrap_or(since);
    let mut fonts: Vec<PathBuf> = dirs
        .iter()
        .flat_map(|dir| WalkDir::new(dir).into_iter().filter_map(|entry| entry.ok()))
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
                .unwrap_or(false)
        })
        .filter(|entry| {
            entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .map(|modified| modified >= threshold)
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    fonts.sort();
    fonts
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| BuildError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(root: &Path) -> BuildOptions {
        BuildOptions::for_family(
            "Noto Sans",
            vec![root.join("src/NotoSans-MM.glyphs")],
            root.join("output"),
        )
    }

    #[test]
    fn test_stage_config_static() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = GftoolsBuilder::stage_config(&options(dir.path()).with_otf(false), BuildStage::Static)
            .unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["familyName"], "Noto Sans");
        assert_eq!(value["buildStatic"], true);
        assert_eq!(value["buildVariable"], false);
        assert_eq!(value["buildOTF"], false);
        assert_eq!(value["buildWebfont"], false);
        assert_eq!(value["autohintTTF"], false);
        assert!(value["ttDir"]
            .as_str()
            .unwrap()
            .ends_with("Noto Sans/unhinted/ttf"));
    }

    #[test]
    fn test_stage_config_variable() {
        let dir = tempfile::tempdir().unwrap();
        let yaml =
            GftoolsBuilder::stage_config(&options(dir.path()), BuildStage::Variable).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["buildStatic"], false);
        assert_eq!(value["buildVariable"], true);
        assert_eq!(value["buildOTF"], false);
        assert!(Path::new(value["sources"][0].as_str().unwrap()).is_absolute());
    }

    #[test]
    fn test_stage_dirs() {
        let options = options(Path::new("/work"));
        assert_eq!(
            GftoolsBuilder::stage_dirs(&options, BuildStage::Static).len(),
            2
        );
        assert_eq!(
            GftoolsBuilder::stage_dirs(&options.clone().with_otf(false), BuildStage::Static),
            vec![options.tt_dir.as_path()]
        );
        assert_eq!(
            GftoolsBuilder::stage_dirs(&options, BuildStage::Variable),
            vec![options.vf_dir.as_path()]
        );
    }

    #[test]
    fn test_collect_fonts_filters() {
        let dir = tempfile::tempdir().unwrap();
        let ttf = dir.path().join("ttf");
        std::fs::create_dir_all(&ttf).unwrap();
        std::fs::write(ttf.join("B-Regular.ttf"), "x").unwrap();
        std::fs::write(ttf.join("A-Regular.TTF"), "x").unwrap();
        std::fs::write(ttf.join("notes.txt"), "x").unwrap();

        let fonts = collect_fonts(&[ttf.as_path(), dir.path().join("missing").as_path()], SystemTime::UNIX_EPOCH);
        assert_eq!(fonts, vec![ttf.join("A-Regular.TTF"), ttf.join("B-Regular.ttf")]);

        let future = SystemTime::now() + Duration::from_secs(3600);
        assert!(collect_fonts(&[ttf.as_path()], future).is_empty());
    }
}
