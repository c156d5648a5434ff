use serde::{Deserialize, Serialize};

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    ConfigError,
    LookupError,
    ValidationError,
    SerializationError,
    RegistrationConflict,
    RegistrationError,
    IoError,
    InternalError,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Error,
    Warning,
    Info,
    Debug,
}

/// Outcome of registering one state machine against the local registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationOutcome {
    Created,
    Updated,
}

impl std::fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationOutcome::Created => write!(f, "created"),
            RegistrationOutcome::Updated => write!(f, "updated"),
        }
    }
}
