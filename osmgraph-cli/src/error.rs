use colored::Colorize;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const UNKNOWN_ARGUMENT: i32 = 10;
    pub const CACHE_NOT_EXISTS: i32 = 20;
    pub const CACHE_NOT_DIRECTORY: i32 = 21;
    pub const INPUT_MISSING: i32 = 30;
    pub const INPUT_NOT_EXISTS: i32 = 31;
    pub const INPUT_IS_DIRECTORY: i32 = 32;
}

/// Unified error type for CLI operations.
pub enum CliError {
    /// Conversion failure.
    Convert(osmgraph_convert::ConvertError),
    /// Bad paths or argument combinations, with a dedicated exit code.
    Usage { message: String, code: i32 },
}

impl CliError {
    pub fn usage(message: impl Into<String>, code: i32) -> Self {
        CliError::Usage {
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Convert(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Usage { message, .. } => write!(f, "{} {message}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<osmgraph_convert::ConvertError> for CliError {
    fn from(e: osmgraph_convert::ConvertError) -> Self {
        CliError::Convert(e)
    }
}

/// Print the error and exit with its code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage { code, .. } => *code,
        CliError::Convert(_) => exit_code::FAILURE,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
