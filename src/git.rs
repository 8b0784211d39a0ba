//! Git status probe
//!
//! Answers two questions about a directory: is it a git working tree, and
//! what commit is HEAD. A missing `git` binary or a directory outside any
//! repository is a normal answer, not an error.
//!
//! [`GitCli::summary`] additionally collects raw repository data (branch,
//! recent commits, working-tree changes, upstream divergence) without
//! interpreting it.

use crate::error::{AtlasError, AtlasResult};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// What the probe observed for a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitStatus {
    /// Not inside a working tree, or git is unavailable
    NotRepository,
    /// A working tree with no commits yet
    Unborn,
    /// A working tree whose HEAD resolves to this full commit id
    Head(String),
}

impl GitStatus {
    /// Whether the directory is a git working tree
    pub fn is_git(&self) -> bool {
        !matches!(self, Self::NotRepository)
    }

    /// The HEAD commit id, if there is one
    pub fn head(&self) -> Option<&str> {
        match self {
            Self::Head(head) => Some(head),
            _ => None,
        }
    }
}

/// Source of git status for a project directory
pub trait GitProbe {
    /// Probe `dir`. Errors are reserved for failures inside a real repository.
    fn status(&self, dir: &Path) -> AtlasResult<GitStatus>;
}

/// One entry of `git log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub hash: String,
    pub author: String,
    /// Author date, strict ISO 8601
    pub date: String,
    pub subject: String,
}

/// One entry of `git status --porcelain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Two-letter index/worktree status code, e.g. `" M"` or `"??"`
    pub status: String,
    pub path: String,
}

/// Divergence from the configured upstream branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracking {
    pub upstream: String,
    pub ahead: u32,
    pub behind: u32,
}

/// Raw repository data for a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSummary {
    pub is_git: bool,
    pub git_head: Option<String>,
    /// `None` when HEAD is detached or outside a repository
    pub branch: Option<String>,
    /// Newest first
    pub recent_commits: Vec<CommitSummary>,
    pub changed_files: Vec<ChangedFile>,
    pub tracking: Option<Tracking>,
}

impl GitSummary {
    fn not_repository() -> Self {
        Self {
            is_git: false,
            git_head: None,
            branch: None,
            recent_commits: Vec::new(),
            changed_files: Vec::new(),
            tracking: None,
        }
    }
}

const FIELD_SEP: char = '\u{1f}';

/// Probe backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
}

impl GitCli {
    /// Create a probe invoking the given git executable
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run `git -C <dir> <args>`; `None` when the binary is missing
    fn run(&self, dir: &Path, args: &[&str]) -> AtlasResult<Option<Output>> {
        let result = Command::new(&self.binary)
            .arg("-C")
            .arg(dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        match result {
            Ok(output) => Ok(Some(output)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found on PATH", self.binary);
                Ok(None)
            }
            Err(e) => Err(AtlasError::command_failed(self.describe(args), e)),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }

    /// Stdout of a command that must succeed inside a repository
    fn run_checked(&self, dir: &Path, args: &[&str]) -> AtlasResult<String> {
        match self.run(dir, args)? {
            Some(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Some(output) => Err(AtlasError::git(
                self.describe(args),
                String::from_utf8_lossy(&output.stderr).trim(),
            )),
            None => Err(AtlasError::git(self.describe(args), "git binary not found")),
        }
    }

    /// Trimmed stdout of a command whose failure just means "not applicable"
    fn run_optional(&self, dir: &Path, args: &[&str]) -> AtlasResult<Option<String>> {
        Ok(self
            .run(dir, args)?
            .filter(|output| output.status.success())
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .filter(|out| !out.is_empty()))
    }

    /// Collect branch, the last `limit` commits, working-tree changes, and
    /// upstream divergence for `dir`
    pub fn summary(&self, dir: &Path, limit: usize) -> AtlasResult<GitSummary> {
        let status = self.status(dir)?;
        if !status.is_git() {
            return Ok(GitSummary::not_repository());
        }

        let branch = self.run_optional(dir, &["symbolic-ref", "--short", "-q", "HEAD"])?;

        let recent_commits = match status.head() {
            Some(_) if limit > 0 => {
                let count = format!("--max-count={limit}");
                let log = self.run_checked(
                    dir,
                    &["log", count.as_str(), "--format=%H%x1f%an%x1f%aI%x1f%s"],
                )?;
                parse_log(&log)
            }
            _ => Vec::new(),
        };

        let porcelain = self.run_checked(dir, &["status", "--porcelain=v1"])?;
        let changed_files = parse_porcelain(&porcelain);

        let tracking = match self.run_optional(
            dir,
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{upstream}"],
        )? {
            Some(upstream) => self
                .run_optional(dir, &["rev-list", "--left-right", "--count", "@{upstream}...HEAD"])?
                .and_then(|counts| parse_divergence(&counts))
                .map(|(behind, ahead)| Tracking {
                    upstream,
                    ahead,
                    behind,
                }),
            None => None,
        };

        debug!(
            "Summary of {}: {} commit(s), {} change(s)",
            dir.display(),
            recent_commits.len(),
            changed_files.len()
        );

        Ok(GitSummary {
            is_git: true,
            git_head: status.head().map(str::to_string),
            branch,
            recent_commits,
            changed_files,
            tracking,
        })
    }
}

fn parse_log(log: &str) -> Vec<CommitSummary> {
    log.lines()
        .filter_map(|line| {
            let mut fields = line.splitn(4, FIELD_SEP);
            Some(CommitSummary {
                hash: fields.next()?.to_string(),
                author: fields.next()?.to_string(),
                date: fields.next()?.to_string(),
                subject: fields.next().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

fn parse_porcelain(porcelain: &str) -> Vec<ChangedFile> {
    porcelain
        .lines()
        .filter(|line| line.len() > 3)
        .filter_map(|line| {
            Some(ChangedFile {
                status: line.get(..2)?.to_string(),
                path: line.get(3..)?.to_string(),
            })
        })
        .collect()
}

/// `rev-list --left-right --count` prints "<behind>\t<ahead>"
fn parse_divergence(counts: &str) -> Option<(u32, u32)> {
    let mut parts = counts.split_whitespace();
    let behind = parts.next()?.parse().ok()?;
    let ahead = parts.next()?.parse().ok()?;
    Some((behind, ahead))
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitProbe for GitCli {
    fn status(&self, dir: &Path) -> AtlasResult<GitStatus> {
        let inside = ["rev-parse", "--is-inside-work-tree"];
        let Some(output) = self.run(dir, &inside)? else {
            return Ok(GitStatus::NotRepository);
        };

        if !output.status.success() || String::from_utf8_lossy(&output.stdout).trim() != "true" {
            debug!("{} is not a git working tree", dir.display());
            return Ok(GitStatus::NotRepository);
        }

        let head = ["rev-parse", "--verify", "--quiet", "HEAD^{commit}"];
        let Some(output) = self.run(dir, &head)? else {
            return Ok(GitStatus::NotRepository);
        };

        if output.status.success() {
            let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
            debug!("HEAD of {} is {}", dir.display(), sha);
            return Ok(GitStatus::Head(sha));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // --quiet exits 1 silently when HEAD does not resolve yet
        if output.status.code() == Some(1) && stderr.is_empty() {
            debug!("{} has no commits yet", dir.display());
            return Ok(GitStatus::Unborn);
        }

        Err(AtlasError::git(self.describe(&head), stderr))
    }
}
