//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: engine error (unknown engine, empty export, degenerate input)
//! - 11: I/O error (SVG/PNG write, reading a seed file)
//! - 12: input error (bad JSON params, malformed seed file)
//! - 13: serialization error

use gen_art_core::EngineError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// An engine-level error, including "nothing to export".
    Engine(EngineError),
    /// A filesystem error.
    Io(String),
    /// Something the user passed in could not be understood.
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "I/O error: {msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            other => CliError::Engine(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let codes = [
            CliError::Engine(EngineError::UnknownEngine("foo".into())).exit_code(),
            CliError::Io("write failed".into()).exit_code(),
            CliError::Input("bad params".into()).exit_code(),
            CliError::Serialization("json fail".into()).exit_code(),
        ];
        assert_eq!(codes, [10, 11, 12, 13]);
    }

    #[test]
    fn empty_export_is_an_engine_error() {
        let cli_err = CliError::from(EngineError::EmptyGeometry);
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("nothing to export"));
    }

    #[test]
    fn from_engine_error_io_routes_to_cli_io() {
        let cli_err = CliError::from(EngineError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_std_io_error_routes_to_cli_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "seed.json missing");
        let cli_err = CliError::from(io);
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("seed.json missing"));
    }

    #[test]
    fn degenerate_input_routes_to_cli_engine() {
        let cli_err = CliError::from(EngineError::DegenerateInput("duplicate points".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("duplicate points"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
