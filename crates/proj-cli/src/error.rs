//! Error types for proj-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from proj-spec
    #[error(transparent)]
    Spec(#[from] proj_spec::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_error_displays_transparently() {
        let err: CliError = proj_spec::Error::malformed("metadata.name").into();
        assert_eq!(
            err.to_string(),
            "Malformed configuration: missing or invalid metadata.name"
        );
    }

    #[test]
    fn test_user_error_displays_message() {
        assert_eq!(CliError::user("no such module").to_string(), "no such module");
    }
}
