//! swanctl-complete - completion oracle for the swanctl CLI
//!
//! The shell's completion function hands over the words typed so far; this
//! library decides which options are still legal at the cursor and, for
//! arguments naming live objects (connections, SAs, pools), asks the
//! charon daemon over VICI for the current names and identifiers.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;

pub use error::{Error, Result};
