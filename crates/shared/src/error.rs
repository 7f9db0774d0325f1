//! Error types for the smart home simulation

use thiserror::Error;

/// Error returned when a permission level does not authorize an action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Action '{action}' is not permitted for permission level '{level}'")]
pub struct PermissionDeniedError {
    pub action: String,
    pub level: String,
}

/// Error returned when an action is applied to the wrong kind of target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Action '{action}' cannot be applied to {target}")]
pub struct IncompatibleTargetError {
    pub action: String,
    pub target: String,
}

/// General smart home error type
#[derive(Debug, Error)]
pub enum HomeError {
    #[error("Invalid identifier '{0}': only word characters and whitespace are allowed")]
    InvalidIdentifier(String),

    #[error("No such location '{0}'")]
    NoSuchLocation(String),

    #[error("Location '{0}' is reserved and cannot hold a room")]
    ReservedLocation(String),

    #[error("Invalid wall slot '{0}': expected north, east, south or west")]
    InvalidWallSlot(String),

    #[error("No {fixture} at '{location}'")]
    NoSuchFixture { location: String, fixture: String },

    #[error("Unknown person '{0}'")]
    UnknownPerson(String),

    #[error("Room '{location}' already has the maximum of {limit} connections")]
    ConnectionLimitExceeded { location: String, limit: usize },

    #[error("Connecting '{a}' and '{b}' would close a triangle through '{via}'")]
    TriangleConnection { a: String, b: String, via: String },

    #[error("Room '{0}' cannot be connected to itself")]
    SelfConnection(String),

    #[error("Tour root has not been set")]
    RootNotSet,

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDeniedError),

    #[error(transparent)]
    IncompatibleTarget(#[from] IncompatibleTargetError),

    #[error("Cannot close openables while a window is obstructed")]
    ObstructedWindowPresent,

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Unknown permission level '{0}'")]
    UnknownPermissionLevel(String),

    #[error("Invalid away mode delay {0}ms: the delay must be positive")]
    InvalidDelay(i64),

    #[error("No actor is set for this session")]
    NoActor,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, HomeError>;
