//! Exit codes for the snippet CLI.
//!
//! Distinct codes let scripts tell template errors apart from broken
//! input or configuration.

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no errors
    Success = 0,
    /// The template code has errors, or compilation was refused
    DiagnosticError = 1,
    /// Configuration error (invalid or unreadable config file)
    ConfigError = 2,
    /// The scanner input could not be parsed or assembled
    InputError = 3,
    /// I/O error (file read/write failure)
    IoError = 4,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Pick the exit code for a failed command.
    pub fn for_error(error: &anyhow::Error) -> Self {
        if error.downcast_ref::<snippet_config::ConfigError>().is_some() {
            Self::ConfigError
        } else if error
            .downcast_ref::<snippet_assembler::AssemblerError>()
            .is_some()
            || error.downcast_ref::<serde_json::Error>().is_some()
        {
            Self::InputError
        } else {
            Self::IoError
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::DiagnosticError => write!(f, "diagnostic error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::InputError => write!(f, "input error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::InputError.code(), 3);
        assert_eq!(ExitCode::ConfigError.to_string(), "configuration error");
    }

    #[test]
    fn test_for_error() {
        let config = anyhow::Error::new(snippet_config::ConfigError::UnsupportedFormat(
            "x.toml".into(),
        ));
        assert_eq!(ExitCode::for_error(&config), ExitCode::ConfigError);

        let input = anyhow::Error::new(snippet_assembler::AssemblerError::NotFinalized);
        assert_eq!(ExitCode::for_error(&input), ExitCode::InputError);

        let io = anyhow::Error::new(std::io::Error::other("boom"));
        assert_eq!(ExitCode::for_error(&io), ExitCode::IoError);
    }
}
