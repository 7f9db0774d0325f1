//! Identifier validation for room ids, person names and permission names

use crate::{HomeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w\s]+$").expect("identifier pattern is valid"))
}

/// A validated name: non-empty, word characters and whitespace only
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validate a raw string as an [`Identifier`]
pub fn validate(s: &str) -> Result<Identifier> {
    if identifier_pattern().is_match(s) {
        Ok(Identifier(s.to_string()))
    } else {
        Err(HomeError::InvalidIdentifier(s.to_string()))
    }
}

impl TryFrom<&str> for Identifier {
    type Error = HomeError;

    fn try_from(value: &str) -> Result<Self> {
        validate(value)
    }
}

impl TryFrom<String> for Identifier {
    type Error = HomeError;

    fn try_from(value: String) -> Result<Self> {
        validate(&value)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        validate(&raw).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_word_characters() {
        assert_eq!(validate("kitchen").unwrap().as_str(), "kitchen");
        assert!(validate("living_room").is_ok());
        assert!(validate("Room 2").is_ok());
        assert!(validate("bedroom_3").is_ok());
    }

    #[test]
    fn test_accepts_unicode_letters() {
        assert!(validate("salle à manger").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        let err = validate("").unwrap_err();
        assert!(matches!(err, HomeError::InvalidIdentifier(s) if s.is_empty()));
    }

    #[test]
    fn test_rejects_punctuation() {
        for bad in ["living-room", "alice!", "a/b", "../etc", "x.y", "semi;colon"] {
            assert!(
                matches!(validate(bad), Err(HomeError::InvalidIdentifier(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Identifier = serde_json::from_str(r#""hall""#).unwrap();
        assert_eq!(ok.as_str(), "hall");

        let bad: std::result::Result<Identifier, _> = serde_json::from_str(r#""hall-way""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_identifier_ordering_is_lexical() {
        let mut ids = vec![validate("b").unwrap(), validate("a").unwrap()];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
    }
}
