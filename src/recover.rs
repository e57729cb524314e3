//! The end-to-end recovery pipeline.

use std::path::PathBuf;

use chrono::Local;
use thiserror::Error;

use crate::config::{DEFAULT_ARTIFACT, DEFAULT_BRANCH};
use crate::filter::{self, EmailFilter};
use crate::history::read_history;
use crate::target::{self, create_target, derive_target};
use crate::{git, path, replay};

/// Everything one run needs, after flags and config file have been merged.
#[derive(Debug, Clone)]
pub struct RecoverOptions {
    /// Source repository path as the user typed it.
    pub source: String,

    /// Where to create the new repository; derived from `source` if `None`.
    pub target: Option<PathBuf>,

    /// Accepted author emails; `git config user.email` if `None`.
    pub email_filters: Option<Vec<String>>,

    pub hide_message: bool,
    pub branch: String,
    pub artifact: String,
}

impl RecoverOptions {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
            email_filters: None,
            hide_message: false,
            branch: DEFAULT_BRANCH.to_string(),
            artifact: DEFAULT_ARTIFACT.to_string(),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub target: PathBuf,

    /// Commits read from the source.
    pub scanned: usize,

    /// Commits written to the target.
    pub replayed: usize,
}

/// Read the source history, keep the accepted authors' commits and replay
/// them into a fresh repository.
///
/// Nothing is written until the history has been read and the filter
/// resolved. A failure during replay leaves the partial target in place.
pub fn recover(options: &RecoverOptions) -> Result<Summary, Error> {
    let source = path::to_native(&options.source);

    let records = read_history(&source).map_err(|e| match e {
        git::Error::NotARepo(path) => Error::SourceNotFound { path },
        other => Error::History(other),
    })?;
    let scanned = records.len();

    let filter = EmailFilter::resolve(options.email_filters.as_deref())?;
    let retained = filter.retain(records);
    tracing::info!(
        scanned,
        retained = retained.len(),
        emails = ?filter.emails().collect::<Vec<_>>(),
        "filtered source history"
    );

    let target_path = match &options.target {
        Some(target) => target.clone(),
        None => derive_target(&source, &Local::now()),
    };
    let git = create_target(&target_path, &options.branch)?;

    let replayed = replay::replay(&git, &retained, options.hide_message, &options.artifact)?;

    Ok(Summary {
        target: target_path,
        scanned,
        replayed,
    })
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("source repository path '{path}' does not exist or is not a git repository")]
    SourceNotFound { path: String },

    #[error("failed to read source history")]
    History(#[source] git::Error),

    #[error("could not determine which author emails to keep")]
    Identity(#[from] filter::Error),

    #[error(transparent)]
    Target(#[from] target::Error),

    #[error(transparent)]
    Replay(#[from] replay::Error),
}

impl Error {
    /// Failures that are reported to the operator rather than treated as faults.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Error::SourceNotFound { .. } | Error::Identity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::tests::{commit_as, init_repo};
    use tempfile::TempDir;

    fn options(source: &std::path::Path, target: PathBuf, emails: &[&str]) -> RecoverOptions {
        RecoverOptions {
            target: Some(target),
            email_filters: Some(emails.iter().map(|e| e.to_string()).collect()),
            ..RecoverOptions::new(source.display().to_string())
        }
    }

    #[test]
    fn missing_source_is_diagnostic() {
        let temp = TempDir::new().unwrap();
        let opts = options(&temp.path().join("gone"), temp.path().join("out"), &["a@x"]);
        let err = recover(&opts).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
        assert!(err.is_diagnostic());
        assert!(!temp.path().join("out").exists());
    }

    #[test]
    fn existing_target_is_a_fault_and_untouched() {
        let source = init_repo();
        commit_as(source.path(), "a@x", "2020-01-01T00:00:00+00:00", "one");
        let out = TempDir::new().unwrap();

        let err = recover(&options(source.path(), out.path().to_path_buf(), &["a@x"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Target(target::Error::AlreadyExists { .. })
        ));
        assert!(!err.is_diagnostic());
        assert!(!out.path().join(".git").exists());
    }

    #[test]
    fn empty_source_gives_empty_target() {
        let source = init_repo();
        let out = TempDir::new().unwrap();
        let target = out.path().join("recovered");

        let summary = recover(&options(source.path(), target.clone(), &["a@x"])).unwrap();
        assert_eq!(summary.scanned, 0);
        assert_eq!(summary.replayed, 0);
        assert!(target.join(".git").is_dir());
    }

    #[test]
    fn bare_mirror_is_a_valid_source() {
        let origin = init_repo();
        commit_as(origin.path(), "a@x", "2020-01-01T00:00:00+00:00", "one");
        commit_as(origin.path(), "b@x", "2020-01-02T00:00:00+00:00", "two");
        let out = TempDir::new().unwrap();
        let mirror = out.path().join("mirror.git");
        crate::git::tests::git(
            out.path(),
            &["clone", "--quiet", "--mirror", origin.path().to_str().unwrap(), "mirror.git"],
        );

        // No accepted author, so nothing needs an identity to be committed.
        let target = out.path().join("recovered");
        let summary = recover(&options(&mirror, target.clone(), &["nobody@x"])).unwrap();
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.replayed, 0);
        assert!(target.join(".git").is_dir());
    }
}
