//! swanctl-complete - completion oracle for the swanctl bash completion

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;

use swanctl_complete::cli::{Cli, ExitCode};
use swanctl_complete::completion::{self, Completion};
use swanctl_complete::config::{ExpandedConfig, load_config_from_path_or_default};
use swanctl_complete::logging::{self, LogConfig};
use swanctl_complete::session::Endpoint;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    let cli = match Cli::parse_known(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => return respond(&Completion::empty()),
    };

    // A broken config file must not break completion
    let (config, config_error) = match load_config(&cli) {
        Ok(config) => (config, None),
        Err(e) => (ExpandedConfig::default(), Some(e)),
    };

    init_logging(&cli, &config);
    if let Some(e) = config_error {
        tracing::warn!("Ignoring configuration: {:#}", e);
    }

    let completion = match run(&cli, &config).await {
        Ok(completion) => completion,
        Err(e) => {
            tracing::warn!("Completion failed: {:#}", e);
            Completion::empty()
        }
    };
    respond(&completion)
}

/// Compute the completion for the request on the command line
async fn run(cli: &Cli, config: &ExpandedConfig) -> Result<Completion> {
    let ctx = cli.context().context("Invalid completion request")?;
    tracing::debug!(
        hint = ?cli.hint,
        cword = ctx.cword(),
        cur = ctx.cur(),
        prev = ctx.prev(),
        words = ?ctx.words(),
        "Completion request"
    );

    let endpoint = Endpoint::resolve(&[cli.uri(), config.uri.as_deref()])
        .context("Invalid VICI endpoint")?;

    Ok(completion::complete(&ctx, &endpoint).await)
}

fn load_config(cli: &Cli) -> Result<ExpandedConfig> {
    let config_file = load_config_from_path_or_default(cli.config.as_deref())?;
    config_file
        .config
        .expand_paths()
        .with_context(|| format!("Invalid configuration in {}", config_file.path.display()))
}

/// Initialize logging with tracing-subscriber
fn init_logging(cli: &Cli, config: &ExpandedConfig) {
    let mut log_config = LogConfig::new();
    if let Some(path) = &config.log_file {
        log_config = log_config.with_log_file(path);
    }
    if cli.verbose {
        log_config = log_config.verbose();
    } else if cli.quiet {
        log_config = log_config.quiet();
    }
    // Completion still works without logging
    let _ = logging::init_with_config(log_config);
}

/// Print the single completion line and map the exit status
fn respond(completion: &Completion) -> std::process::ExitCode {
    println!("{}", completion.line());
    let exit: ExitCode = completion.exit;
    exit.into()
}
