//! Option model and the filters deciding which options are still offerable

/// One switch of a swanctl command, reachable via a short and a long alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionPair {
    pub short: &'static str,
    pub long: &'static str,
}

impl OptionPair {
    pub const fn new(short: &'static str, long: &'static str) -> Self {
        Self { short, long }
    }

    /// Check whether `word` is either alias of this option
    pub fn contains(&self, word: &str) -> bool {
        self.short == word || self.long == word
    }

    /// Both aliases, short form first
    pub fn aliases(&self) -> [&'static str; 2] {
        [self.short, self.long]
    }

    /// Check whether any of `words` names this option
    pub fn present_in<S: AsRef<str>>(&self, words: &[S]) -> bool {
        words.iter().any(|w| self.contains(w.as_ref()))
    }
}

/// Options of which at most one may appear on a command line
pub type ExclusionGroup = &'static [OptionPair];

/// `--raw` and `--pretty` select the output format of every command
pub const RAW: OptionPair = OptionPair::new("-r", "--raw");
pub const PRETTY: OptionPair = OptionPair::new("-P", "--pretty");
const OUTPUT_FORMAT: &[OptionPair] = &[RAW, PRETTY];

/// Options remaining after removing those already typed
///
/// The result lists the short then the long alias of each remaining
/// option, in table order.
pub fn filter<S: AsRef<str>>(words: &[S], table: &[OptionPair]) -> Vec<&'static str> {
    filter_conflicting(words, table, &[])
}

/// Like [`filter`], additionally dropping every member of an exclusion
/// group once any member of that group was typed
pub fn filter_conflicting<S: AsRef<str>>(
    words: &[S],
    table: &[OptionPair],
    groups: &[ExclusionGroup],
) -> Vec<&'static str> {
    let mut offerable: Vec<&'static str> = table.iter().flat_map(OptionPair::aliases).collect();

    for group in groups.iter().copied().chain(std::iter::once(OUTPUT_FORMAT)) {
        if group.iter().any(|opt| opt.present_in(words)) {
            for opt in group {
                remove_option(&mut offerable, opt);
            }
        }
    }

    for opt in table {
        if opt.present_in(words) {
            remove_option(&mut offerable, opt);
        }
    }

    offerable
}

/// Remove both aliases of `opt`, a no-op for absent aliases
fn remove_option(offerable: &mut Vec<&'static str>, opt: &OptionPair) {
    offerable.retain(|alias| !opt.contains(alias));
}

/// Check whether the two collections share at least one string
pub fn matches<A: AsRef<str>, B: AsRef<str>>(candidates: &[A], reference: &[B]) -> bool {
    candidates
        .iter()
        .any(|c| reference.iter().any(|r| c.as_ref() == r.as_ref()))
}
