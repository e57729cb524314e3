//! Creating the repository commits are replayed into.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use thiserror::Error;

use crate::git::{self, Git};

/// Suffix joined to the source path when no target is given.
const TARGET_SUFFIX: &str = "-commitment-recovery-";

/// Default target location: `<source>-commitment-recovery-<YYYY-MM-DD-HH-MM-SS>`.
pub fn derive_target<Tz>(source: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    // Collecting components drops any trailing separator.
    let mut name = source.components().collect::<PathBuf>().into_os_string();
    name.push(TARGET_SUFFIX);
    name.push(now.format("%Y-%m-%d-%H-%M-%S").to_string());
    PathBuf::from(name)
}

/// Create `path` (its parent must exist) and initialize an empty repository
/// there on `branch`.
pub fn create_target(path: &Path, branch: &str) -> Result<Git, Error> {
    std::fs::create_dir(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            Error::AlreadyExists {
                path: path.display().to_string(),
            }
        } else {
            Error::CreateDir {
                path: path.display().to_string(),
                source,
            }
        }
    })?;

    let git = Git::init(path, branch)?;
    tracing::info!(target = %path.display(), branch, "initialized target repository");
    Ok(git)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("target directory '{path}' already exists")]
    AlreadyExists { path: String },

    #[error("failed to create target directory '{path}'")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to initialize target repository")]
    Init(#[from] git::Error),
}
