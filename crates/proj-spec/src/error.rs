//! Error types for proj-spec

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// A domain failure raised by a configuration validator.
///
/// Only this error kind receives extension context when validation fails;
/// every other [`Error`] variant is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A required field is absent.
    pub fn missing_field(path: &str) -> Self {
        Self::new(format!("missing field {path}"))
    }

    /// A field is present but has the wrong shape.
    pub fn invalid_field(path: &str, expectation: &str) -> Self {
        Self::new(format!("field {path} must be {expectation}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed configuration: missing or invalid {field}")]
    MalformedConfiguration { field: String },

    #[error("Invalid specification: {message}")]
    InvalidSpecification { message: String },

    #[error(
        "No specification registered for kind '{kind}' and type '{}'",
        .spec_type.as_deref().unwrap_or("<none>")
    )]
    UnknownSpecificationKind {
        kind: String,
        spec_type: Option<String>,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to validate configuration of {extension_type} extension {name}: {source}")]
    ExtensionValidation {
        extension_type: String,
        name: String,
        #[source]
        source: ValidationError,
    },

    #[error("Invalid specVersion '{version}': {source}")]
    InvalidSpecVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Unsupported specVersion '{version}' (minimum {minimum})")]
    UnsupportedSpecVersion { version: String, minimum: String },

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse configuration at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Foreign(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedConfiguration {
            field: field.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSpecification {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a failure of unknown origin so it travels through untouched.
    pub fn foreign(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Foreign(Box::new(err))
    }
}
