//! Completion engine
//!
//! This module decides what the shell should offer at the cursor:
//! - `options`: option model and the filters removing already used or
//!   conflicting options
//! - `table`: the static command/option table of swanctl
//! - `resolver`: candidates for option values naming live daemon objects
//! - `dispatch`: ties the above together for one completion request

mod context;
pub mod dispatch;
pub mod options;
pub mod resolver;
pub mod table;

pub use context::CompletionContext;
pub use dispatch::complete;
pub use options::{ExclusionGroup, OptionPair, filter, filter_conflicting, matches};

use crate::cli::ExitCode;

/// Outcome of one completion request: the words to print and the exit
/// status telling the shell script what to do next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub candidates: Vec<String>,
    pub exit: ExitCode,
}

impl Completion {
    /// Final candidates
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            exit: ExitCode::Success,
        }
    }

    /// No candidates at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// No candidates of our own; the shell script takes over
    pub fn deferred(exit: ExitCode) -> Self {
        Self {
            candidates: Vec::new(),
            exit,
        }
    }

    pub fn from_strs(candidates: &[&str]) -> Self {
        Self::new(candidates.iter().map(|s| s.to_string()).collect())
    }

    /// The single output line, candidates separated by spaces
    pub fn line(&self) -> String {
        self.candidates.join(" ")
    }
}
