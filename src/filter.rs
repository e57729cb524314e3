//! Selecting which commits are "ours".

use std::collections::BTreeSet;

use thiserror::Error;

use crate::git;
use crate::history::CommitRecord;

/// The set of author emails whose commits get replayed.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailFilter {
    emails: BTreeSet<String>,
}

impl EmailFilter {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// Use `explicit` when given, otherwise the operator's `user.email`.
    pub fn resolve(explicit: Option<&[String]>) -> Result<Self, Error> {
        if let Some(emails) = explicit {
            return Ok(Self::new(emails.iter().cloned()));
        }

        match git::config_value("user.email") {
            Ok(Some(email)) => {
                tracing::info!(email = %email, "filtering on configured git user.email");
                Ok(Self::new([email]))
            }
            Ok(None) => Err(Error::Unset),
            Err(source) => Err(Error::Lookup { source }),
        }
    }

    pub fn accepts(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    /// Keep only records authored by an accepted email, preserving order.
    pub fn retain(&self, records: Vec<CommitRecord>) -> Vec<CommitRecord> {
        records
            .into_iter()
            .filter(|r| self.accepts(&r.author_email))
            .collect()
    }
}

/// Failure to work out which emails to accept.
#[derive(Debug, Error)]
pub enum Error {
    #[error("git config user.email is not set; pass --email_filters explicitly")]
    Unset,

    #[error("failed to read git config user.email")]
    Lookup {
        #[source]
        source: git::Error,
    },
}
