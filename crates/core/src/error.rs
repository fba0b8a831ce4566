//! Errors raised while loading configuration, touching the session file or
//! checking user input
//!
//! Every [`Error`] carries an [`ErrorCode`]. The code, not the message text,
//! decides how the CLI exits: bad input exits with
//! [`exit_codes::VALIDATION_ERROR`], a broken environment with
//! [`exit_codes::CONFIG_ERROR`].

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// What failed, numbered by area: 3xxx configuration, 4xxx session, 6xxx input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Configuration file exists but could not be read
    ConfigError = 3000,
    /// `--config` named a file that is not there
    ConfigNotFound = 3001,
    /// TOML syntax or an unknown enum value
    ConfigParseError = 3002,
    /// Parsed, but a value is out of range
    ConfigValidationError = 3003,

    /// No place to keep the session file
    SessionError = 4000,
    /// Session file exists but could not be read
    SessionLoadError = 4001,
    /// Session file could not be written
    SessionSaveError = 4002,

    /// User input rejected by a [`crate::validation::Validator`]
    ValidationError = 6000,
}

impl ErrorCode {
    /// Numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// True for problems the user can fix by changing their input
    pub fn is_user_input(&self) -> bool {
        self.code() / 1000 == 6
    }

    /// Process exit status for a command that failed with this code
    pub fn exit_code(&self) -> i32 {
        if self.is_user_input() {
            exit_codes::VALIDATION_ERROR
        } else {
            exit_codes::CONFIG_ERROR
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Error with a code, optional context and a hint for fixing it
#[derive(Error, Debug)]
pub struct Error {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Where it happened, e.g. which file
    pub context: Option<String>,
    /// How to fix it
    pub suggestion: Option<String>,
    /// Underlying cause
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Attach context
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach a hint
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Configuration file could not be read
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// `--config` pointed nowhere
    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .bookshare.toml file or use --config to specify a path")
    }

    /// A configuration value is out of range
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
            .with_suggestion("See the [locator], [placement], [map] and [logging] sections of .bookshare.toml")
    }

    /// No session location available
    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SessionError, message)
    }

    /// Reading the session file at `path` failed
    pub fn session_load(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(
            ErrorCode::SessionLoadError,
            format!("Failed to read session {}", path.display()),
        )
        .with_source(source)
    }

    /// Writing the session file at `path` failed
    pub fn session_save(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(
            ErrorCode::SessionSaveError,
            format!("Failed to write session {}", path.display()),
        )
        .with_source(source)
        .with_suggestion("Pass --session with a writable path")
    }

    /// Input rejected
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
#[allow(missing_docs)]
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const NO_RESULTS: i32 = 4;
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}")).with_source(err)
    }
}

/// Attach context to a failed [`Result`]
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ConfigNotFound.to_string(), "E3001");
        assert_eq!(ErrorCode::SessionSaveError.to_string(), "E4002");
    }

    #[test]
    fn test_exit_code_by_area() {
        assert_eq!(ErrorCode::ValidationError.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(ErrorCode::ConfigValidationError.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::SessionLoadError.exit_code(), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_config_not_found_has_hint() {
        let err = Error::config_not_found("/path/to/bookshare.toml");
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.to_string().contains("Suggestion: Create a .bookshare.toml"));
    }

    #[test]
    fn test_result_ext_chains_context() {
        let result: Result<()> = Err(Error::invalid_config("locator.default_radius_km: Must be between 1 and 50"));
        let err = result.context("In .bookshare.toml").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("In .bookshare.toml"));
        assert!(err.to_string().contains("Context: In .bookshare.toml"));
    }

    #[test]
    fn test_session_save_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = Error::session_save(Path::new("/ro/session.json"), io);
        assert_eq!(err.code, ErrorCode::SessionSaveError);
        assert!(err.message.contains("/ro/session.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
