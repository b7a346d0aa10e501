//! Completion state handed over by the shell

use crate::completion::OptionPair;
use crate::error::{Error, Result};

/// Index of the swanctl command word (`--initiate`, `-t`, ...)
const COMMAND_INDEX: usize = 1;

/// The shell's view of the command line at the moment Tab was pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionContext {
    /// All words, index 0 being the swanctl binary
    words: Vec<String>,
    /// Word under the cursor
    cur: String,
    /// Word before the cursor
    prev: String,
    /// Index of the cursor word within `words`
    cword: usize,
}

impl CompletionContext {
    /// Create a context from already split words
    pub fn new(
        words: Vec<String>,
        cur: impl Into<String>,
        prev: impl Into<String>,
        cword: usize,
    ) -> Self {
        Self {
            words,
            cur: cur.into(),
            prev: prev.into(),
            cword,
        }
    }

    /// Parse the raw `COMP_*` strings passed by the completion script
    ///
    /// `words` is a single shell-quoted string and is split with POSIX
    /// shell rules.
    pub fn parse(cword: &str, cur: &str, prev: &str, words: &str) -> Result<Self> {
        let cword: usize = cword
            .trim()
            .parse()
            .map_err(|e| Error::Malformed(format!("invalid cword '{}': {}", cword, e)))?;

        let words = shlex::split(words)
            .ok_or_else(|| Error::Malformed(format!("cannot split words '{}'", words)))?;

        Ok(Self::new(words, cur, prev, cword))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn cur(&self) -> &str {
        &self.cur
    }

    pub fn prev(&self) -> &str {
        &self.prev
    }

    pub fn cword(&self) -> usize {
        self.cword
    }

    /// The swanctl command word, if one was typed
    pub fn command(&self) -> Option<&str> {
        self.words.get(COMMAND_INDEX).map(String::as_str)
    }

    /// Words following the command
    pub fn arguments(&self) -> &[String] {
        self.words.get(COMMAND_INDEX + 1..).unwrap_or_default()
    }

    /// Whether the previous word is an argument of the command rather than
    /// the command itself or the binary
    pub fn prev_is_argument(&self) -> bool {
        self.cword > COMMAND_INDEX + 1
    }

    /// Words that may name the option whose value is being completed
    pub fn option_words(&self) -> Vec<&str> {
        if self.prev_is_argument() {
            vec![self.prev.as_str(), self.cur.as_str()]
        } else {
            vec![self.cur.as_str()]
        }
    }

    /// Value typed after the last occurrence of `option`, ignoring the word
    /// currently being completed
    pub fn option_value(&self, option: &OptionPair) -> Option<&str> {
        let args_start = COMMAND_INDEX + 1;
        let mut value = None;
        for (i, word) in self.words.iter().enumerate().skip(args_start) {
            if !option.contains(word) {
                continue;
            }
            let value_index = i + 1;
            if value_index == self.cword {
                continue;
            }
            if let Some(next) = self.words.get(value_index) {
                if !next.starts_with('-') {
                    value = Some(next.as_str());
                }
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IKE: OptionPair = OptionPair::new("-i", "--ike");

    #[test]
    fn test_parse_simple() {
        let ctx = CompletionContext::parse("2", "", "--initiate", "swanctl --initiate ''").unwrap();
        assert_eq!(ctx.cword(), 2);
        assert_eq!(ctx.words(), &["swanctl", "--initiate", ""]);
        assert_eq!(ctx.command(), Some("--initiate"));
        assert!(ctx.arguments().iter().all(|w| w.is_empty()));
    }

    #[test]
    fn test_parse_quoted_words() {
        let ctx =
            CompletionContext::parse("3", "", "--ike", r#"swanctl -i --ike "my conn""#).unwrap();
        assert_eq!(ctx.words(), &["swanctl", "-i", "--ike", "my conn"]);
    }

    #[test]
    fn test_parse_invalid_cword() {
        let result = CompletionContext::parse("two", "", "", "swanctl");
        assert!(matches!(result, Err(Error::Malformed(_))));
    }

    #[test]
    fn test_parse_unbalanced_quotes() {
        let result = CompletionContext::parse("1", "", "", "swanctl 'oops");
        assert!(matches!(result, Err(Error::Malformed(_))));
    }

    #[test]
    fn test_command_missing() {
        let ctx = CompletionContext::new(vec!["swanctl".into()], "", "", 1);
        assert_eq!(ctx.command(), None);
        assert!(ctx.arguments().is_empty());
    }

    #[test]
    fn test_prev_is_argument() {
        let words: Vec<String> = ["swanctl", "-t", ""].iter().map(|s| s.to_string()).collect();
        let ctx = CompletionContext::new(words.clone(), "", "-t", 2);
        assert!(!ctx.prev_is_argument());
        assert_eq!(ctx.option_words(), vec![""]);

        let ctx = CompletionContext::new(words, "", "-c", 3);
        assert!(ctx.prev_is_argument());
        assert_eq!(ctx.option_words(), vec!["-c", ""]);
    }

    #[test]
    fn test_option_value() {
        let words: Vec<String> = ["swanctl", "-i", "--ike", "home", "-c", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ctx = CompletionContext::new(words, "", "-c", 5);
        assert_eq!(ctx.option_value(&IKE), Some("home"));
    }

    #[test]
    fn test_option_value_skips_cursor_word() {
        let words: Vec<String> = ["swanctl", "-i", "--ike", "ho"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ctx = CompletionContext::new(words, "ho", "--ike", 3);
        assert_eq!(ctx.option_value(&IKE), None);
    }

    #[test]
    fn test_option_value_ignores_command_token() {
        // `-i` at index 1 is the initiate command, not the --ike option
        let words: Vec<String> = ["swanctl", "-i", "peer", "-c", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ctx = CompletionContext::new(words, "", "-c", 4);
        assert_eq!(ctx.option_value(&IKE), None);
    }
}
