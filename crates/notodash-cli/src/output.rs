// Output formatting and styling

use std::fmt::Write as _;
use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use notodash_dashboard::{RunSummary, Selection};

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputStyle {
    /// Plain output, for tests and pipes
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().underline().to_string()
        } else {
            title.to_string()
        }
    }
}

/// Print an error message to stderr
pub fn print_error(msg: &str) {
    let style = OutputStyle {
        use_colors: std::io::stderr().is_terminal(),
    };
    eprintln!("{}", style.error(msg));
}

/// Files produced by a single-project build, sorted
pub fn format_produced<'a, I>(paths: I) -> String
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut paths: Vec<&Path> = paths.into_iter().collect();
    paths.sort();

    let mut out = String::from("Produced the following files:\n");
    for path in paths {
        let _ = writeln!(out, "* {}", path.display());
    }
    out
}

/// The queue a dry run would build
pub fn format_plan(style: &OutputStyle, selection: &Selection) -> String {
    let mut out = format!("{}\n", style.header("Build queue"));
    if selection.queue.is_empty() {
        out.push_str("Nothing to build\n");
    }
    for project in &selection.queue {
        let _ = writeln!(
            out,
            "* {} ({})",
            project.family,
            project.fingerprint.as_deref().unwrap_or("no fingerprint")
        );
    }
    if selection.truncated() > 0 {
        let _ = writeln!(
            out,
            "{}",
            style.warning(&format!("{} more changed projects left for later runs", selection.truncated()))
        );
    }
    append_exclusions(&mut out, style, &selection.skipped_denylisted, selection.collisions.len());
    out
}

/// Figures of a finished run
pub fn format_summary(style: &OutputStyle, summary: &RunSummary) -> String {
    let mut out = format!("{}\n", style.header("Run summary"));
    let _ = writeln!(out, "Built: {}", summary.built);
    for family in &summary.selected {
        if summary.failed.contains(family) {
            let _ = writeln!(out, "{}", style.error(family));
        } else {
            let _ = writeln!(out, "{}", style.success(family));
        }
    }
    if summary.truncated > 0 {
        let _ = writeln!(
            out,
            "{}",
            style.warning(&format!("{} more changed projects left for later runs", summary.truncated))
        );
    }
    append_exclusions(&mut out, style, &summary.skipped_denylisted, summary.collisions.len());
    let _ = writeln!(out, "Issue script keys: {}", summary.issues_indexed);
    out
}

fn append_exclusions(out: &mut String, style: &OutputStyle, denylisted: &[String], collisions: usize) {
    if !denylisted.is_empty() {
        let _ = writeln!(out, "Denylisted: {}", denylisted.join(", "));
    }
    if collisions > 0 {
        let _ = writeln!(
            out,
            "{}",
            style.warning(&format!("{} sources skipped on family name collisions", collisions))
        );
    }
}
