//! Writing one synthetic commit per retained source commit.

use std::fs::OpenOptions;
use std::io::{self, Write};

use thiserror::Error;

use crate::git::{self, Git};
use crate::history::CommitRecord;

/// Message for the replayed commit.
///
/// With `hide_message` only the original date survives; otherwise the
/// original message and a `source:` line naming the original hash follow it.
pub fn commit_message(record: &CommitRecord, hide_message: bool) -> String {
    if hide_message {
        record.timestamp.format("%Y/%m/%d %H:%M:%S").to_string()
    } else {
        format!(
            "{}{}\nsource: {}",
            record.timestamp.format("%Y/%m/%d (%H:%M:%S): "),
            record.message,
            record.content_hash
        )
    }
}

/// Replay `records` (newest first, as read) oldest first into `git`.
///
/// Each commit appends its message to `artifact` at the repository root,
/// stages everything and commits at the original authored time. Stops at the
/// first failure, leaving the commits made so far in place.
pub fn replay(
    git: &Git,
    records: &[CommitRecord],
    hide_message: bool,
    artifact: &str,
) -> Result<usize, Error> {
    let artifact_path = git.root().join(artifact);
    let total = records.len();

    for (idx, record) in records.iter().rev().enumerate() {
        let message = commit_message(record, hide_message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&artifact_path)
            .map_err(|source| Error::Artifact {
                path: artifact_path.display().to_string(),
                source,
            })?;
        write!(file, "{message}\n\n").map_err(|source| Error::Artifact {
            path: artifact_path.display().to_string(),
            source,
        })?;
        drop(file);

        git.add_all()?;
        let hash = git.commit_at(&message, &record.timestamp)?;
        tracing::info!(
            current = idx + 1,
            total,
            date = %record.timestamp,
            hash = %hash,
            "replayed commit"
        );
    }

    Ok(total)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to append to '{path}'")]
    Artifact {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to record replayed commit")]
    Git(#[from] git::Error),
}
