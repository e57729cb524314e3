//! Git repository operations.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, FixedOffset};

use crate::history::{self, CommitRecord};

/// Pretty format for `git log`: hash, strict ISO author date, author email and
/// raw body, separated by US (0x1f) with each record terminated by NUL, which
/// a commit message cannot contain.
pub(crate) const LOG_FORMAT: &str = "--format=%H%x1f%aI%x1f%ae%x1f%B%x00";

/// A git repository handle that provides common operations.
#[derive(Debug)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Open the repository at exactly `path`: either the top level of a work
    /// tree or a bare repository (such as a `--mirror` clone).
    ///
    /// Unlike `git rev-parse`, this does not search parent directories: a
    /// subdirectory of some other repository is not a repository.
    pub fn open(path: &Path) -> Result<Self, Error> {
        if !path.is_dir() {
            return Err(Error::NotARepo(path.display().to_string()));
        }

        let output = Command::new("git")
            .args(["rev-parse", "--is-bare-repository", "--absolute-git-dir"])
            .current_dir(path)
            .output()
            .map_err(|e| Error::Exec(format!("git rev-parse: {e}")))?;

        if !output.status.success() {
            return Err(Error::NotARepo(path.display().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines();
        let bare = lines.next() == Some("true");
        let git_dir = PathBuf::from(lines.next().unwrap_or_default());

        let root = if bare {
            git_dir
        } else {
            // Linked worktrees and submodules keep their git dir elsewhere, so
            // compare against the work tree top level instead.
            let toplevel = Command::new("git")
                .args(["rev-parse", "--show-toplevel"])
                .current_dir(path)
                .output()
                .map_err(|e| Error::Exec(format!("git rev-parse: {e}")))?;
            if !toplevel.status.success() {
                return Err(Error::NotARepo(path.display().to_string()));
            }
            PathBuf::from(String::from_utf8_lossy(&toplevel.stdout).trim())
        };

        if !same_dir(&root, path) {
            tracing::debug!(
                path = %path.display(),
                root = %root.display(),
                bare,
                "path is inside a repository but is not its root"
            );
            return Err(Error::NotARepo(path.display().to_string()));
        }

        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Initialize an empty repository in an existing directory.
    pub fn init(path: &Path, branch: &str) -> Result<Self, Error> {
        let git = Self {
            root: path.to_path_buf(),
        };
        let initial_branch = format!("--initial-branch={branch}");
        git.run(&["init", "--quiet", &initial_branch])?;
        Ok(git)
    }

    /// Get the repository root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether HEAD points at a commit (false for a freshly initialized repo).
    pub fn has_head(&self) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", "HEAD"])
            .current_dir(&self.root)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Every commit reachable from HEAD, newest first.
    pub fn log(&self) -> Result<Vec<CommitRecord>, Error> {
        if !self.has_head() {
            tracing::debug!(root = %self.root.display(), "HEAD is unborn, history is empty");
            return Ok(Vec::new());
        }

        let raw = self.run_output(&["log", LOG_FORMAT, "HEAD"])?;
        history::parse_log(&raw)
    }

    /// Stage all changes.
    pub fn add_all(&self) -> Result<(), Error> {
        self.run(&["add", "-A"])
    }

    /// Commit staged changes with both author and committer dates forced to
    /// `timestamp`, returning the short hash.
    pub fn commit_at(
        &self,
        message: &str,
        timestamp: &DateTime<FixedOffset>,
    ) -> Result<String, Error> {
        let date = timestamp.to_rfc3339();
        // Hooks have nothing to check here and must not rewrite the message.
        let status = Command::new("git")
            .args(["commit", "--quiet", "--no-verify", "-m", message, "--date", &date])
            .env("GIT_COMMITTER_DATE", &date)
            .current_dir(&self.root)
            .status()
            .map_err(|e| Error::Exec(format!("git commit: {e}")))?;

        if !status.success() {
            return Err(Error::Failed(format!("git commit --date {date}")));
        }
        self.head_short()
    }

    /// Get the short hash of HEAD.
    pub fn head_short(&self) -> Result<String, Error> {
        let hash = self.run_output(&["rev-parse", "HEAD"])?;
        let hash = hash.trim();
        Ok(hash[..8.min(hash.len())].to_string())
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// Run a git command that produces no output we care about.
    fn run(&self, args: &[&str]) -> Result<(), Error> {
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .status()
            .map_err(|e| Error::Exec(format!("git {}: {e}", args.first().unwrap_or(&""))))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Failed(format!("git {}", args.join(" "))))
        }
    }

    /// Run a git command and capture its stdout.
    fn run_output(&self, args: &[&str]) -> Result<String, Error> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::Exec(format!("git {}: {e}", args.first().unwrap_or(&""))))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(Error::Failed(format!("git {}", args.join(" "))))
        }
    }
}

/// Read a value from the operator's git configuration, as seen from the
/// process working directory.
///
/// Returns `Ok(None)` when the key is unset or empty.
pub fn config_value(key: &str) -> Result<Option<String>, Error> {
    let output = Command::new("git")
        .args(["config", "--get", key])
        .output()
        .map_err(|e| Error::Exec(format!("git config: {e}")))?;

    // `git config --get` exits with 1 when the key is missing.
    if output.status.code() == Some(1) {
        return Ok(None);
    }
    if !output.status.success() {
        return Err(Error::Failed(format!("git config --get {key}")));
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(Some(value).filter(|v| !v.is_empty()))
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Errors from git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to execute: {0}")]
    Exec(String),

    #[error("not a git repository: '{0}'")]
    NotARepo(String),

    #[error("{0}")]
    Failed(String),

    #[error("unexpected git log output: {0}")]
    Parse(String),
}
