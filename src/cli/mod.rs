//! CLI module for swanctl-complete
//!
//! The oracle is not meant to be run by hand: the swanctl bash completion
//! function calls it with its `COMP_*` state on every Tab press.

pub mod exit_code;

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

pub use exit_code::ExitCode;

use crate::completion::CompletionContext;

/// Completion helper for swanctl
#[derive(Parser, Debug)]
#[command(name = "swanctl-complete")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Short command hint passed by the completion script
    #[arg(short = 'c', value_name = "HINT", allow_hyphen_values = true)]
    pub hint: Option<String>,

    /// URI of the VICI service of the charon daemon
    #[arg(short = '+', long, num_args = 1.., env = "SWANCTL_VICI_URI")]
    pub uri: Vec<String>,

    /// Index of the word under the cursor (COMP_CWORD)
    #[arg(long, allow_hyphen_values = true)]
    pub cword: Option<String>,

    /// Word under the cursor
    #[arg(long, allow_hyphen_values = true)]
    pub cur: Option<String>,

    /// Word before the cursor
    #[arg(long, allow_hyphen_values = true)]
    pub prev: Option<String>,

    /// Shell-quoted list of all words on the command line
    #[arg(long, allow_hyphen_values = true)]
    pub words: Option<String>,

    /// Configuration file path
    #[arg(long, env = "SWANCTL_COMPLETE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable all logging
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Parse the arguments, dropping flags this helper does not know
    ///
    /// Completion scripts of other swanctl versions may pass more than
    /// the oracle understands; unknown flags and the values following them
    /// are skipped instead of failing the whole request.
    pub fn parse_known<I>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = String>,
    {
        Self::try_parse_from(known_args(args))
    }

    /// Build the completion context from the `COMP_*` arguments
    pub fn context(&self) -> crate::Result<CompletionContext> {
        let cword = self
            .cword
            .as_deref()
            .ok_or_else(|| crate::Error::Malformed("missing --cword".to_string()))?;
        let words = self
            .words
            .as_deref()
            .ok_or_else(|| crate::Error::Malformed("missing --words".to_string()))?;

        CompletionContext::parse(
            cword,
            self.cur.as_deref().unwrap_or_default(),
            self.prev.as_deref().unwrap_or_default(),
            words,
        )
    }

    /// The endpoint given on the command line, if any
    pub fn uri(&self) -> Option<&str> {
        self.uri.first().map(String::as_str)
    }
}

/// Every flag of the command with the most values it takes
fn flag_table() -> Vec<(String, usize)> {
    let mut cmd = Cli::command();
    cmd.build();

    let mut table = Vec::new();
    for arg in cmd.get_arguments() {
        let max_values = if arg.get_action().takes_values() {
            arg.get_num_args().map_or(1, |range| range.max_values())
        } else {
            0
        };
        if let Some(long) = arg.get_long() {
            table.push((format!("--{}", long), max_values));
        }
        if let Some(short) = arg.get_short() {
            table.push((format!("-{}", short), max_values));
        }
    }
    table
}

/// Keep the program name, known flags and their values
fn known_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let flags = flag_table();
    let max_values = |word: &str| {
        let name = match word.split_once('=') {
            Some((name, _)) if word.starts_with("--") => name,
            _ => word,
        };
        flags
            .iter()
            .find(|(flag, _)| flag == name)
            .map(|(_, max)| *max)
    };

    let mut args = args.into_iter();
    let mut known: Vec<String> = args.next().into_iter().collect();
    // Values still accepted by the last known flag; the first one may
    // start with a hyphen
    let mut pending = 0usize;
    let mut first_value = false;

    for word in args {
        if pending > 0 && (first_value || !word.starts_with('-')) {
            known.push(word);
            pending -= 1;
            first_value = false;
            continue;
        }
        match max_values(&word) {
            Some(max) => {
                pending = if word.contains('=') { 0 } else { max };
                first_value = pending > 0;
                known.push(word);
            }
            None => {
                tracing::trace!(word = %word, "Skipping unknown argument");
                pending = 0;
                first_value = false;
            }
        }
    }
    known
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_completion_state() {
        let cli = parse(&[
            "swanctl-complete",
            "--cword",
            "2",
            "--cur",
            "-",
            "--prev",
            "--initiate",
            "--words",
            "swanctl --initiate -",
        ]);
        let ctx = cli.context().unwrap();
        assert_eq!(ctx.cword(), 2);
        assert_eq!(ctx.cur(), "-");
        assert_eq!(ctx.prev(), "--initiate");
        assert_eq!(ctx.command(), Some("--initiate"));
    }

    #[test]
    fn test_hyphen_values_accepted() {
        let cli = parse(&[
            "swanctl-complete",
            "--cur",
            "-c",
            "--prev",
            "-t",
            "--cword",
            "3",
            "--words",
            "swanctl -t -c",
        ]);
        assert_eq!(cli.cur.as_deref(), Some("-c"));
        assert_eq!(cli.prev.as_deref(), Some("-t"));
    }

    #[test]
    fn test_missing_cword_is_malformed() {
        let cli = parse(&["swanctl-complete", "--words", "swanctl"]);
        assert!(matches!(cli.context(), Err(crate::Error::Malformed(_))));
    }

    #[test]
    fn test_multiple_uris_first_wins() {
        let cli = parse(&[
            "swanctl-complete",
            "--uri",
            "unix:///tmp/a.vici",
            "unix:///tmp/b.vici",
        ]);
        assert_eq!(cli.uri(), Some("unix:///tmp/a.vici"));
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_short_uri_alias() {
        let cli = Cli::parse_known(args(&[
            "swanctl-complete",
            "-+",
            "unix:///tmp/x.vici",
            "--cword",
            "1",
            "--words",
            "swanctl",
        ]))
        .unwrap();
        assert_eq!(cli.uri(), Some("unix:///tmp/x.vici"));
        assert_eq!(cli.context().unwrap().cword(), 1);
    }

    #[test]
    fn test_unknown_flags_are_skipped() {
        let cli = Cli::parse_known(args(&[
            "swanctl-complete",
            "--extra",
            "x",
            "--cword",
            "1",
            "--flag",
            "--words",
            "swanctl",
            "--trailing",
        ]))
        .unwrap();
        let ctx = cli.context().unwrap();
        assert_eq!(ctx.cword(), 1);
        assert_eq!(ctx.words(), &["swanctl"]);
    }

    #[test]
    fn test_known_args_keeps_hyphen_values() {
        let kept = known_args(args(&[
            "swanctl-complete",
            "--cur",
            "--extra",
            "--prev=-t",
            "--bogus",
            "-c",
            "-t",
        ]));
        assert_eq!(
            kept,
            args(&["swanctl-complete", "--cur", "--extra", "--prev=-t", "-c", "-t"])
        );
    }

    #[test]
    fn test_known_args_uri_values() {
        let kept = known_args(args(&["x", "--uri", "a", "b", "-q", "c", "--cword", "2"]));
        assert_eq!(kept, args(&["x", "--uri", "a", "b", "--cword", "2"]));
    }

    #[test]
    fn test_short_command_hint() {
        let cli = parse(&["swanctl-complete", "-c", "-t"]);
        assert_eq!(cli.hint.as_deref(), Some("-t"));
    }
}
