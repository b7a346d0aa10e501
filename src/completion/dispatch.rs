//! Completion request dispatch

use crate::cli::ExitCode;
use crate::completion::resolver::resolve;
use crate::completion::table::{
    self, ArgumentKind, DEBUG, DEBUG_LEVELS, GLOBAL_OPTIONS, HELP, OPTIONS, URI,
};
use crate::completion::{Completion, CompletionContext, filter, filter_conflicting, matches};
use crate::session::Connector;
use tracing::debug;

/// Where the cursor is on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// On the swanctl command itself
    AwaitingCommand,
    /// After the command, on its options and their values
    InCommand,
}

impl State {
    fn of(ctx: &CompletionContext) -> Option<Self> {
        match ctx.cword() {
            0 => None,
            1 => Some(State::AwaitingCommand),
            _ => Some(State::InCommand),
        }
    }
}

/// Compute the completion for one request
///
/// The daemon is only contacted when the cursor is on the value of an
/// option naming a live object.
pub async fn complete<C: Connector>(ctx: &CompletionContext, connector: &C) -> Completion {
    match State::of(ctx) {
        None => {
            debug!(cword = ctx.cword(), "Cursor on the binary, nothing to complete");
            Completion::empty()
        }
        Some(State::AwaitingCommand) => Completion::new(
            table::command_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        ),
        Some(State::InCommand) => complete_command(ctx, connector).await,
    }
}

async fn complete_command<C: Connector>(ctx: &CompletionContext, connector: &C) -> Completion {
    let Some(command) = ctx.command() else {
        debug!("No command on the line");
        return Completion::empty();
    };

    let option_words = ctx.option_words();
    let at = |aliases: [&str; 2]| matches(&option_words, &aliases);

    if at(HELP.aliases()) {
        return Completion::empty();
    }
    if at(URI.aliases()) {
        return resolve(ArgumentKind::Host, ctx, connector).await;
    }
    if at(OPTIONS.aliases()) {
        return Completion::deferred(ExitCode::Filedir);
    }
    if at(DEBUG.aliases()) {
        return Completion::from_strs(DEBUG_LEVELS);
    }

    let Some(spec) = table::lookup(command) else {
        debug!(command = %command, "Unknown command");
        return Completion::empty();
    };
    if table::is_help(spec) {
        return Completion::empty();
    }

    let arguments = ctx.arguments();
    let remaining = filter_conflicting(arguments, spec.options, spec.exclusions);

    if let Some(argument) = spec
        .arguments
        .iter()
        .find(|argument| at(argument.option.aliases()))
    {
        debug!(
            command = spec.long,
            option = argument.option.long,
            kind = ?argument.kind,
            "Completing option value"
        );
        return resolve(argument.kind, ctx, connector).await;
    }

    let globals = filter(arguments, GLOBAL_OPTIONS);
    debug!(
        command = spec.long,
        options = remaining.len(),
        globals = globals.len(),
        "Offering remaining options"
    );
    Completion::new(
        remaining
            .into_iter()
            .chain(globals)
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::protocol::Section;
    use crate::session::{ControlPlane, SaFilter};

    /// A daemon that must not be asked
    struct NoDaemon;

    impl ControlPlane for NoDaemon {
        async fn list_conns(&mut self, _ike: Option<&str>) -> Result<Section> {
            Err(Error::Session("unexpected list-conns".to_string()))
        }

        async fn list_sas(&mut self, _filter: &SaFilter) -> Result<Section> {
            Err(Error::Session("unexpected list-sas".to_string()))
        }

        async fn get_pools(&mut self) -> Result<Section> {
            Err(Error::Session("unexpected get-pools".to_string()))
        }
    }

    impl Connector for NoDaemon {
        type Session = NoDaemon;

        async fn connect(&self) -> Result<NoDaemon> {
            Err(Error::Session("connection refused".to_string()))
        }
    }

    fn ctx(words: &[&str], cur: &str, prev: &str, cword: usize) -> CompletionContext {
        CompletionContext::new(words.iter().map(|s| s.to_string()).collect(), cur, prev, cword)
    }

    /// Complete with the cursor on an empty word at the end of `words`
    async fn after(words: &[&str]) -> Completion {
        let mut line = words.to_vec();
        line.push("");
        let prev = words.last().copied().unwrap_or_default();
        complete(&ctx(&line, "", prev, words.len()), &NoDaemon).await
    }

    #[tokio::test]
    async fn test_command_list() {
        let request = ctx(&["swanctl", "--lo"], "--lo", "swanctl", 1);
        let completion = complete(&request, &NoDaemon).await;
        assert_eq!(completion.exit, ExitCode::Success);
        assert_eq!(completion.candidates.len(), table::COMMANDS.len() * 2);
        assert_eq!(completion.candidates[0], "--counters");
        assert!(completion.candidates.contains(&"-S".to_string()));
    }

    #[tokio::test]
    async fn test_cword_zero() {
        let completion = complete(&ctx(&["swanctl"], "", "", 0), &NoDaemon).await;
        assert_eq!(completion, Completion::empty());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let completion = after(&["swanctl", "--frobnicate"]).await;
        assert_eq!(completion, Completion::empty());
    }

    #[tokio::test]
    async fn test_missing_command_word() {
        let completion = complete(&ctx(&["swanctl"], "", "", 2), &NoDaemon).await;
        assert_eq!(completion, Completion::empty());
    }

    #[tokio::test]
    async fn test_help_stops_completion() {
        let completion = after(&["swanctl", "-i", "--help"]).await;
        assert_eq!(completion, Completion::empty());
    }

    #[tokio::test]
    async fn test_help_command() {
        let completion = after(&["swanctl", "--help"]).await;
        assert_eq!(completion, Completion::empty());
    }

    #[tokio::test]
    async fn test_uri_defers_to_hosts() {
        let completion = after(&["swanctl", "-l", "--uri"]).await;
        assert_eq!(completion, Completion::deferred(ExitCode::KnownHosts));
    }

    #[tokio::test]
    async fn test_options_file_defers_to_filedir() {
        let completion = after(&["swanctl", "-q", "-+"]).await;
        assert_eq!(completion, Completion::deferred(ExitCode::Filedir));
    }

    #[tokio::test]
    async fn test_debug_levels() {
        let completion = after(&["swanctl", "-l", "-v"]).await;
        assert_eq!(completion.line(), "-1 0 1 2 3 4");
    }

    #[tokio::test]
    async fn test_command_token_is_not_an_option() {
        // `-v` is the version command here, not --debug
        let completion = after(&["swanctl", "-v"]).await;
        assert_eq!(
            completion.line(),
            "-d --daemon -h --help -r --raw -P --pretty -v --debug -+ --options -u --uri"
        );
    }

    #[tokio::test]
    async fn test_initiate_options() {
        let completion = after(&["swanctl", "--initiate"]).await;
        assert_eq!(
            completion.line(),
            "-c --child -i --ike -h --help -r --raw -P --pretty -v --debug -+ --options -u --uri"
        );
    }

    #[tokio::test]
    async fn test_used_options_and_raw_pretty_removed() {
        let completion = complete(
            &ctx(&["swanctl", "-l", "--raw", "-i", "x", ""], "", "x", 5),
            &NoDaemon,
        )
        .await;
        assert_eq!(
            completion.line(),
            "-I --ike-id -h --help -v --debug -+ --options -u --uri"
        );
    }

    #[tokio::test]
    async fn test_counters_exclusion() {
        let completion = after(&["swanctl", "-C", "-n", "foo"]).await;
        let candidates = completion.candidates;
        assert!(candidates.contains(&"--reset".to_string()));
        assert!(!candidates.iter().any(|c| c == "-a" || c == "--all"));
        assert!(!candidates.iter().any(|c| c == "-n" || c == "--name"));
    }

    #[tokio::test]
    async fn test_terminate_id_exclusion() {
        let completion = after(&["swanctl", "-t", "-I", "4"]).await;
        let line = completion.line();
        assert!(!line.contains("--child-id"));
        assert!(!line.contains("--ike-id"));
        assert!(line.contains("--force"));
    }

    #[tokio::test]
    async fn test_fixed_cert_types() {
        let completion = after(&["swanctl", "--list-certs", "--type"]).await;
        assert_eq!(completion.line(), "x509 x509_ac x509_crl ocsp_response pubkey");
    }

    #[tokio::test]
    async fn test_load_file_defers_to_filedir() {
        let completion = after(&["swanctl", "--load-conns", "-f"]).await;
        assert_eq!(completion, Completion::deferred(ExitCode::Filedir));
    }

    #[tokio::test]
    async fn test_timeout_has_no_candidates() {
        let completion = after(&["swanctl", "-t", "-t"]).await;
        assert_eq!(completion, Completion::empty());
    }

    #[tokio::test]
    async fn test_unreachable_daemon_yields_empty_line() {
        let completion = after(&["swanctl", "--initiate", "--ike"]).await;
        assert_eq!(completion, Completion::empty());
    }
}
