//! Results of an attempted action that are reported, not raised

use serde::Serialize;
use shared::PermissionDeniedError;

/// Why a permitted action left its target unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Blocked {
    /// The door is locked and cannot be opened
    ByLock,
    /// The door is open and cannot be locked
    ByOpenState,
    /// The window is obstructed and cannot be opened
    ByObstruction,
    /// Away mode needs an empty house
    HouseOccupied,
    /// Away mode cannot close an obstructed window
    ObstructedWindowPresent,
}

impl Blocked {
    pub fn message(&self) -> &'static str {
        match self {
            Blocked::ByLock => "the door is locked",
            Blocked::ByOpenState => "the door is open",
            Blocked::ByObstruction => "the window is obstructed",
            Blocked::HouseOccupied => "someone is still in the house",
            Blocked::ObstructedWindowPresent => "a window is obstructed",
        }
    }
}

impl std::fmt::Display for Blocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// What happened to an attempted action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// State changed; the text describes the new state
    Applied(String),
    /// A fixture or mode precondition failed
    Blocked(Blocked),
    /// The actor's permission level does not include the action
    #[serde(serialize_with = "serialize_denied")]
    Denied(PermissionDeniedError),
}

fn serialize_denied<S>(err: &PermissionDeniedError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(err)
}

impl Outcome {
    pub fn applied(description: impl Into<String>) -> Self {
        Outcome::Applied(description.into())
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn blocked_by(&self) -> Option<Blocked> {
        match self {
            Outcome::Blocked(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied(_))
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Applied(description) => write!(f, "{}", description),
            Outcome::Blocked(reason) => write!(f, "blocked: {}", reason),
            Outcome::Denied(err) => write!(f, "denied: {}", err),
        }
    }
}
