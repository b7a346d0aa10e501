//! Static description of the swanctl commands and their options

use crate::completion::options::{ExclusionGroup, OptionPair, PRETTY, RAW};

/// What kind of value an option expects, and so where its candidates
/// come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Name of a configured connection
    IkeName,
    /// Name of an established IKE_SA
    ActiveIkeName,
    /// Name of a CHILD_SA, configured or established
    ChildName,
    /// Unique id of an established IKE_SA
    IkeId,
    /// Unique id of an established CHILD_SA
    ChildId,
    /// Name of a virtual IP address pool
    Pool,
    /// Timeout in milliseconds
    Timeout,
    /// Path on the local filesystem
    File,
    /// Host name or URI
    Host,
    /// One of a fixed set of keywords
    Fixed(&'static [&'static str]),
    /// Arbitrary text nobody can guess
    FreeForm,
}

/// An option taking a value, and the kind of that value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    pub option: OptionPair,
    pub kind: ArgumentKind,
}

/// One swanctl command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub long: &'static str,
    pub short: &'static str,
    pub options: &'static [OptionPair],
    pub exclusions: &'static [ExclusionGroup],
    pub arguments: &'static [Argument],
}

impl CommandSpec {
    const fn new(long: &'static str, short: &'static str) -> Self {
        Self {
            long,
            short,
            options: &[],
            exclusions: &[],
            arguments: &[],
        }
    }

    const fn options(mut self, options: &'static [OptionPair]) -> Self {
        self.options = options;
        self
    }

    const fn exclusions(mut self, exclusions: &'static [ExclusionGroup]) -> Self {
        self.exclusions = exclusions;
        self
    }

    const fn arguments(mut self, arguments: &'static [Argument]) -> Self {
        self.arguments = arguments;
        self
    }

    /// Check whether `word` names this command
    pub fn is(&self, word: &str) -> bool {
        self.long == word || self.short == word
    }
}

pub const HELP: OptionPair = OptionPair::new("-h", "--help");
pub const DEBUG: OptionPair = OptionPair::new("-v", "--debug");
pub const OPTIONS: OptionPair = OptionPair::new("-+", "--options");
pub const URI: OptionPair = OptionPair::new("-u", "--uri");

/// Options accepted by every command
pub const GLOBAL_OPTIONS: &[OptionPair] = &[HELP, RAW, PRETTY, DEBUG, OPTIONS, URI];

/// Levels accepted by `--debug`
pub const DEBUG_LEVELS: &[&str] = &["-1", "0", "1", "2", "3", "4"];

const CHILD: OptionPair = OptionPair::new("-c", "--child");
const IKE: OptionPair = OptionPair::new("-i", "--ike");
const CHILD_ID: OptionPair = OptionPair::new("-C", "--child-id");
const IKE_ID: OptionPair = OptionPair::new("-I", "--ike-id");
const NAME: OptionPair = OptionPair::new("-n", "--name");
const FILE: OptionPair = OptionPair::new("-f", "--file");
const CLEAR: OptionPair = OptionPair::new("-c", "--clear");
const NOPROMPT: OptionPair = OptionPair::new("-n", "--noprompt");
const TYPE: OptionPair = OptionPair::new("-t", "--type");
const ALL: OptionPair = OptionPair::new("-a", "--all");
const RESET: OptionPair = OptionPair::new("-R", "--reset");
const FORCE: OptionPair = OptionPair::new("-f", "--force");
const TIMEOUT: OptionPair = OptionPair::new("-t", "--timeout");
const REAUTH: OptionPair = OptionPair::new("-a", "--reauth");
const PEER_ID: OptionPair = OptionPair::new("-p", "--peer-id");
const GATEWAY: OptionPair = OptionPair::new("-g", "--gateway");
const TRAP: OptionPair = OptionPair::new("-t", "--trap");
const DROP: OptionPair = OptionPair::new("-d", "--drop");
const PASS: OptionPair = OptionPair::new("-p", "--pass");
const SUBJECT: OptionPair = OptionPair::new("-s", "--subject");
const FLAG: OptionPair = OptionPair::new("-f", "--flag");
const PEM: OptionPair = OptionPair::new("-p", "--pem");
const SHORT: OptionPair = OptionPair::new("-S", "--short");
const UTC: OptionPair = OptionPair::new("-U", "--utc");
const LEASES: OptionPair = OptionPair::new("-l", "--leases");
const DAEMON: OptionPair = OptionPair::new("-d", "--daemon");

const CERT_TYPES: &[&str] = &["x509", "x509_ac", "x509_crl", "ocsp_response", "pubkey"];
const CERT_FLAGS: &[&str] = &["none", "ca", "aa", "ocsp", "any"];

/// Selecting an SA by id excludes selecting the other kind by id
const BY_ID: &[ExclusionGroup] = &[&[CHILD_ID, IKE_ID]];

const LOAD_OPTIONS: &[OptionPair] = &[CLEAR, NOPROMPT, FILE];
const LOAD_ARGUMENTS: &[Argument] = &[Argument { option: FILE, kind: ArgumentKind::File }];
const INSTALL_OPTIONS: &[OptionPair] = &[IKE, CHILD];
const INSTALL_ARGUMENTS: &[Argument] = &[
    Argument { option: IKE, kind: ArgumentKind::IkeName },
    Argument { option: CHILD, kind: ArgumentKind::ChildName },
];

/// Every command, in the order `swanctl --help` lists them
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec::new("--counters", "-C")
        .options(&[NAME, ALL, RESET])
        .exclusions(&[&[NAME, ALL]])
        .arguments(&[Argument { option: NAME, kind: ArgumentKind::IkeName }]),
    CommandSpec::new("--initiate", "-i")
        .options(&[CHILD, IKE])
        .arguments(&[
            Argument { option: CHILD, kind: ArgumentKind::ChildName },
            Argument { option: IKE, kind: ArgumentKind::IkeName },
        ]),
    CommandSpec::new("--terminate", "-t")
        .options(&[CHILD, IKE, CHILD_ID, IKE_ID, FORCE, TIMEOUT])
        .exclusions(BY_ID)
        .arguments(&[
            Argument { option: CHILD, kind: ArgumentKind::ChildName },
            Argument { option: IKE, kind: ArgumentKind::ActiveIkeName },
            Argument { option: CHILD_ID, kind: ArgumentKind::ChildId },
            Argument { option: IKE_ID, kind: ArgumentKind::IkeId },
            Argument { option: TIMEOUT, kind: ArgumentKind::Timeout },
        ]),
    CommandSpec::new("--rekey", "-R")
        .options(&[CHILD, IKE, CHILD_ID, IKE_ID, REAUTH])
        .exclusions(BY_ID)
        .arguments(&[
            Argument { option: CHILD, kind: ArgumentKind::ChildName },
            Argument { option: IKE, kind: ArgumentKind::ActiveIkeName },
            Argument { option: CHILD_ID, kind: ArgumentKind::ChildId },
            Argument { option: IKE_ID, kind: ArgumentKind::IkeId },
        ]),
    CommandSpec::new("--redirect", "-d")
        .options(&[IKE, IKE_ID, PEER_ID, GATEWAY])
        .arguments(&[
            Argument { option: IKE, kind: ArgumentKind::ActiveIkeName },
            Argument { option: IKE_ID, kind: ArgumentKind::IkeId },
            Argument { option: PEER_ID, kind: ArgumentKind::FreeForm },
            Argument { option: GATEWAY, kind: ArgumentKind::FreeForm },
        ]),
    CommandSpec::new("--uninstall", "-u")
        .options(INSTALL_OPTIONS)
        .arguments(INSTALL_ARGUMENTS),
    CommandSpec::new("--install", "-p")
        .options(INSTALL_OPTIONS)
        .arguments(INSTALL_ARGUMENTS),
    CommandSpec::new("--list-sas", "-l")
        .options(&[IKE, IKE_ID])
        .arguments(&[
            Argument { option: IKE, kind: ArgumentKind::ActiveIkeName },
            Argument { option: IKE_ID, kind: ArgumentKind::IkeId },
        ]),
    CommandSpec::new("--monitor-sa", "-m"),
    CommandSpec::new("--list-pols", "-P")
        .options(&[CHILD, TRAP, DROP, PASS])
        .arguments(&[Argument { option: CHILD, kind: ArgumentKind::ChildName }]),
    CommandSpec::new("--list-authorities", "-B")
        .options(&[NAME])
        .arguments(&[Argument { option: NAME, kind: ArgumentKind::FreeForm }]),
    CommandSpec::new("--list-conns", "-L"),
    CommandSpec::new("--list-certs", "-x")
        .options(&[SUBJECT, TYPE, FLAG, PEM, SHORT, UTC])
        .arguments(&[
            Argument { option: SUBJECT, kind: ArgumentKind::FreeForm },
            Argument { option: TYPE, kind: ArgumentKind::Fixed(CERT_TYPES) },
            Argument { option: FLAG, kind: ArgumentKind::Fixed(CERT_FLAGS) },
        ]),
    CommandSpec::new("--list-pools", "-A")
        .options(&[LEASES, NAME, FILE])
        .arguments(&[
            Argument { option: NAME, kind: ArgumentKind::Pool },
            Argument { option: FILE, kind: ArgumentKind::File },
        ]),
    CommandSpec::new("--list-algs", "-g"),
    CommandSpec::new("--flush-certs", "-f")
        .options(&[TYPE])
        .arguments(&[Argument { option: TYPE, kind: ArgumentKind::Fixed(CERT_TYPES) }]),
    CommandSpec::new("--load-all", "-q")
        .options(LOAD_OPTIONS)
        .arguments(LOAD_ARGUMENTS),
    CommandSpec::new("--load-authorities", "-b")
        .options(&[FILE])
        .arguments(LOAD_ARGUMENTS),
    CommandSpec::new("--load-conns", "-c")
        .options(&[FILE])
        .arguments(LOAD_ARGUMENTS),
    CommandSpec::new("--load-creds", "-s")
        .options(LOAD_OPTIONS)
        .arguments(LOAD_ARGUMENTS),
    CommandSpec::new("--load-pools", "-a")
        .options(LOAD_OPTIONS)
        .arguments(LOAD_ARGUMENTS),
    CommandSpec::new("--log", "-T"),
    CommandSpec::new("--version", "-v").options(&[DAEMON]),
    CommandSpec::new("--stats", "-S"),
    CommandSpec::new("--reload-settings", "-r"),
    CommandSpec::new("--help", "-h"),
];

/// Find the command named by `word`
pub fn lookup(word: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|cmd| cmd.is(word))
}

/// All command names, long forms first
pub fn command_names() -> Vec<&'static str> {
    COMMANDS
        .iter()
        .map(|cmd| cmd.long)
        .chain(COMMANDS.iter().map(|cmd| cmd.short))
        .collect()
}

/// Check whether the command takes no options at all, not even global ones
pub fn is_help(cmd: &CommandSpec) -> bool {
    HELP.contains(cmd.long)
}
