//! Project content signals gathered during preflight
//!
//! Cheap, best-effort detection of what a project already contains: a README,
//! a package manifest, stack marker files, and source files at the root or
//! under `src/`. Unreadable files simply leave their signal unset.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

const README_NAMES: [&str; 2] = ["README.md", "readme.md"];
const README_EXCERPT_LINES: usize = 3;
const README_EXCERPT_CHARS: usize = 200;
const CODE_EXTENSIONS: [&str; 7] = ["py", "js", "ts", "rs", "go", "jsx", "tsx"];

/// Language stack inferred from manifests or source files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    Python,
    Rust,
    Go,
    Node,
}

/// What a project already contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSignals {
    pub has_readme: bool,
    /// First prose lines of the README, joined and truncated
    pub readme_excerpt: String,
    pub has_package_json: bool,
    pub package_name: String,
    pub package_description: String,
    pub has_pyproject: bool,
    pub has_cargo_toml: bool,
    pub has_go_mod: bool,
    /// A recognised source file at the root or directly under `src/`
    pub has_code_files: bool,
    /// Manifests first, then stacks inferred from source files
    pub detected_stack: Vec<Stack>,
    /// No code, no manifests, and at most two root files
    pub is_empty_project: bool,
}

impl ProjectSignals {
    fn push_stack(&mut self, stack: Stack) {
        if !self.detected_stack.contains(&stack) {
            self.detected_stack.push(stack);
        }
    }

    fn has_manifest(&self) -> bool {
        self.has_readme
            || self.has_package_json
            || self.has_pyproject
            || self.has_cargo_toml
            || self.has_go_mod
    }
}

/// Detect content signals for `root`, given its non-CLAUDE root file count
pub fn detect_signals(root: &Path, root_file_count: usize) -> ProjectSignals {
    let mut signals = ProjectSignals::default();

    if let Some(readme) = README_NAMES.iter().map(|n| root.join(n)).find(|p| p.is_file()) {
        signals.has_readme = true;
        if let Ok(bytes) = fs::read(&readme) {
            signals.readme_excerpt = readme_excerpt(&String::from_utf8_lossy(&bytes));
        }
    }

    let package_json = root.join("package.json");
    if package_json.is_file() {
        signals.has_package_json = true;
        if let Some(package) = read_package(&package_json) {
            signals.package_name = string_field(&package, "name");
            signals.package_description = string_field(&package, "description");
        }
    }

    if root.join("pyproject.toml").is_file() {
        signals.has_pyproject = true;
        signals.push_stack(Stack::Python);
    }
    if root.join("Cargo.toml").is_file() {
        signals.has_cargo_toml = true;
        signals.push_stack(Stack::Rust);
    }
    if root.join("go.mod").is_file() {
        signals.has_go_mod = true;
        signals.push_stack(Stack::Go);
    }
    if signals.has_package_json {
        signals.push_stack(Stack::Node);
    }

    let src = root.join("src");
    let mut search = vec![root.to_path_buf()];
    if src.is_dir() {
        search.push(src);
    }
    for dir in &search {
        if let Some(ext) = first_code_extension(dir) {
            signals.has_code_files = true;
            match ext.as_str() {
                "py" => signals.push_stack(Stack::Python),
                "js" | "jsx" | "ts" | "tsx" => signals.push_stack(Stack::Node),
                _ => {}
            }
        }
    }

    signals.is_empty_project =
        !signals.has_code_files && !signals.has_manifest() && root_file_count <= 2;

    debug!(
        "Signals for {}: stack={:?} empty={}",
        root.display(),
        signals.detected_stack,
        signals.is_empty_project
    );
    signals
}

fn readme_excerpt(content: &str) -> String {
    let joined = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .take(README_EXCERPT_LINES)
        .collect::<Vec<_>>()
        .join(" ");
    joined.chars().take(README_EXCERPT_CHARS).collect()
}

fn read_package(path: &Path) -> Option<serde_json::Value> {
    let bytes = fs::read(path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring unparsable {}: {}", path.display(), e);
            None
        }
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Extension of the first source file found directly in `dir`
fn first_code_extension(dir: &Path) -> Option<String> {
    let entries = fs::read_dir(dir).ok()?;
    entries.flatten().find_map(|entry| {
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            return None;
        }
        let path = entry.path();
        let ext = path.extension()?.to_str()?;
        CODE_EXTENSIONS.contains(&ext).then(|| ext.to_string())
    })
}
