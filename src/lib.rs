//! Commitment recovery: carry your commit history over to a fresh repository.
//!
//! Reads the commits of a source repository, keeps those authored by a set of
//! emails and replays them, oldest first, as a linear history in a newly
//! created repository. Only the authored timestamps (and optionally the
//! messages) survive; file contents, branches and merges do not.
//!
//! # Architecture
//!
//! - **Path**: Translate Windows source paths under WSL
//! - **History**: Read commit records from the source repository
//! - **Filter**: Resolve accepted author emails and select commits
//! - **Target**: Create and initialize the destination repository
//! - **Replay**: Write one synthetic commit per retained record
//! - **Recover**: Run the whole pipeline
//! - **Config**: Optional TOML defaults for the command line

pub mod config;
pub mod filter;
pub mod git;
pub mod history;
pub mod path;
mod recover;
pub mod replay;
pub mod target;

pub use config::RecoveryConfig;
pub use filter::EmailFilter;
pub use history::{CommitRecord, read_history};
pub use recover::{Error, RecoverOptions, Summary, recover};
