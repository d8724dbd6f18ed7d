use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::describe::{DerivedVersion, DescribeLine};

/// Tag pattern used when no `--match` pattern is configured.
pub const DEFAULT_MATCH: &str = "v*";

/// Options forwarded to `git describe`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeOptions {
    /// Ask git to print its search strategy on stderr
    pub debug: bool,
    /// Use any tag, even lightweight ones
    pub tags: bool,
    /// Only follow the first parent of merges
    pub first_parent: bool,
    /// Digits used for abbreviated object names
    pub abbrev: Option<u32>,
    /// Tag glob patterns to consider (empty means [`DEFAULT_MATCH`])
    pub matches: Vec<String>,
    /// Tag glob patterns to ignore
    pub excludes: Vec<String>,
    /// Commits to describe (empty means HEAD)
    pub commitish: Vec<String>,
}

impl DescribeOptions {
    /// Arguments passed to git, starting with `describe`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["describe", "--always", "--long"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        if self.debug {
            args.push("--debug".to_string());
        }
        if self.tags {
            args.push("--tags".to_string());
        }
        if self.first_parent {
            args.push("--first-parent".to_string());
        }
        if let Some(abbrev) = self.abbrev {
            // git only accepts the attached form; a separate value is read as a commit
            args.push(format!("--abbrev={}", abbrev));
        }

        if self.matches.is_empty() {
            args.push("--match".to_string());
            args.push(DEFAULT_MATCH.to_string());
        }
        for pattern in &self.matches {
            args.push("--match".to_string());
            args.push(pattern.clone());
        }
        for pattern in &self.excludes {
            args.push("--exclude".to_string());
            args.push(pattern.clone());
        }

        args.extend(self.commitish.iter().cloned());
        args
    }
}

/// Check if `dir` is inside a git repository.
///
/// Fails when `dir` is not a directory or git cannot be run at all, so a
/// mistyped path is never mistaken for "not a repository".
pub fn is_git_repo(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let status = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("Failed to execute git rev-parse")?;
    Ok(status.success())
}

/// Check if the repository at `dir` has a commit on HEAD
pub fn has_commits(dir: &Path) -> Result<bool> {
    let status = Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", "HEAD"])
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("Failed to execute git rev-parse")?;
    Ok(status.success())
}

/// Run `git describe` in `dir` and return its output lines.
pub fn describe(options: &DescribeOptions, dir: &Path) -> Result<Vec<String>> {
    let args = options.to_args();
    tracing::debug!("git {}", args.join(" "));

    // With --debug git explains its search on stderr; let that through
    let stderr = if options.debug {
        Stdio::inherit()
    } else {
        Stdio::piped()
    };

    let output = Command::new("git")
        .args(&args)
        .current_dir(dir)
        .stderr(stderr)
        .output()
        .context("Failed to execute git describe")?;

    if !output.status.success() {
        anyhow::bail!(
            "git describe failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.split_whitespace().map(str::to_string).collect())
}

/// Describe the requested commits and derive a version for each.
pub fn versions(options: &DescribeOptions, dir: &Path) -> Result<Vec<DerivedVersion>> {
    describe(options, dir)?
        .iter()
        .map(|line| {
            tracing::debug!("describe: {}", line);
            DescribeLine::parse(line)
                .and_then(|parsed| parsed.derive())
                .with_context(|| format!("Cannot derive a version from '{}'", line))
        })
        .collect()
}
