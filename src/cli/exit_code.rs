//! Exit code definitions for swanctl-complete
//!
//! The wrapping bash completion function inspects the exit status to decide
//! whether it has to run one of its own completers after ours.

/// Exit codes understood by the swanctl bash completion script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ExitCode {
    /// Printed candidates are final
    #[default]
    Success = 0,
    /// Caller should additionally complete filesystem paths (`_filedir`)
    Filedir = 4,
    /// Caller should additionally complete host names / URLs
    KnownHosts = 5,
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> Self {
        code as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(u8::from(ExitCode::Success), 0);
        assert_eq!(u8::from(ExitCode::Filedir), 4);
        assert_eq!(u8::from(ExitCode::KnownHosts), 5);
    }

    #[test]
    fn test_default_is_success() {
        assert_eq!(ExitCode::default(), ExitCode::Success);
    }
}
