//! Reading commit records out of a source repository.

use std::path::Path;

use chrono::{DateTime, FixedOffset};

use crate::git::{self, Git};

/// One commit of the source repository, as much of it as gets replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Authored time, in the author's own UTC offset.
    pub timestamp: DateTime<FixedOffset>,

    /// Full message with surrounding whitespace trimmed.
    pub message: String,

    pub author_email: String,

    /// Full hex hash of the original commit.
    pub content_hash: String,
}

/// Read every commit reachable from the source repository's HEAD, newest first.
pub fn read_history(source: &Path) -> Result<Vec<CommitRecord>, git::Error> {
    let repo = Git::open(source)?;
    let records = repo.log()?;
    tracing::info!(source = %source.display(), commits = records.len(), "read source history");
    Ok(records)
}

/// Parse output produced with `git::LOG_FORMAT`.
pub(crate) fn parse_log(raw: &str) -> Result<Vec<CommitRecord>, git::Error> {
    raw.split('\0')
        .map(|chunk| chunk.trim_start_matches(['\n', '\r']))
        .filter(|chunk| !chunk.is_empty())
        .map(parse_record)
        .collect()
}

fn parse_record(chunk: &str) -> Result<CommitRecord, git::Error> {
    let mut fields = chunk.splitn(4, '\x1f');
    let (Some(hash), Some(date), Some(email), Some(body)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(git::Error::Parse(format!("truncated record {chunk:?}")));
    };

    let timestamp = DateTime::parse_from_rfc3339(date)
        .map_err(|e| git::Error::Parse(format!("bad author date {date:?} for {hash}: {e}")))?;

    Ok(CommitRecord {
        timestamp,
        message: body.trim().to_string(),
        author_email: email.to_string(),
        content_hash: hash.to_string(),
    })
}
