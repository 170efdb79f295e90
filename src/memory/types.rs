//! Core memory type definitions.
//!
//! Defines [`InteractionRecord`] (one persisted prompt/response exchange),
//! [`RecallKey`] (a parsed recall token), and [`FilterMode`] (how facts are
//! narrowed before prompt assembly).

use serde::{Deserialize, Serialize};

use super::error::{MemoryError, Result};

/// Label given to interactions when the caller supplies none.
pub const DEFAULT_NAME: &str = "bro";

/// One prompt/response exchange, matching the JSON objects in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// The prompt text as sent.
    pub input: String,
    /// The completion text returned for `input`.
    pub output: String,
    /// Free-form label.
    #[serde(default = "default_name")]
    pub name: String,
    /// Marks the record as protected from pruning. Stored, never acted upon.
    #[serde(default)]
    pub favorite: bool,
    /// Reserved identifier slot, always `false`.
    #[serde(default)]
    pub uid: bool,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl InteractionRecord {
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        name: Option<&str>,
        favorite: bool,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            name: name.unwrap_or(DEFAULT_NAME).to_string(),
            favorite,
            uid: false,
        }
    }
}

/// A caller-supplied recall token, parsed once at the façade boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecallKey {
    /// Reverse index: 0 is the most recent record.
    Index(usize),
    /// Anything that is not numeric. Reserved for lookup by name.
    Freeform(String),
}

impl RecallKey {
    /// Parse a raw token.
    ///
    /// All-digit tokens are indices; digits with a leading sign, or too many
    /// digits to fit, are [`MemoryError::InvalidIndex`]. Everything else is freeform.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        let unsigned = token
            .strip_prefix('-')
            .or_else(|| token.strip_prefix('+'));

        if let Some(digits) = unsigned {
            if is_digits(digits) {
                return Err(MemoryError::InvalidIndex(token.to_string()));
            }
        }

        if is_digits(token) {
            return token
                .parse::<usize>()
                .map(Self::Index)
                .map_err(|_| MemoryError::InvalidIndex(token.to_string()));
        }

        Ok(Self::Freeform(token.to_string()))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// How the fact log is narrowed before it reaches a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Return the fact log unchanged.
    Passthrough,
    /// Rank facts against the query with the external embedding service.
    EmbeddingRank,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::EmbeddingRank => "embedding",
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "passthrough" => Ok(Self::Passthrough),
            "embedding" => Ok(Self::EmbeddingRank),
            _ => Err(format!("unknown filter mode: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_digits_as_index() {
        assert_eq!(RecallKey::parse("0").unwrap(), RecallKey::Index(0));
        assert_eq!(RecallKey::parse("42").unwrap(), RecallKey::Index(42));
        assert_eq!(RecallKey::parse(" 7 ").unwrap(), RecallKey::Index(7));
    }

    #[test]
    fn parse_signed_or_overflowing_as_invalid() {
        for token in ["-1", "+3", "99999999999999999999999999"] {
            assert!(
                matches!(RecallKey::parse(token), Err(MemoryError::InvalidIndex(_))),
                "{token} should be invalid"
            );
        }
    }

    #[test]
    fn parse_text_as_freeform() {
        assert_eq!(
            RecallKey::parse("list files").unwrap(),
            RecallKey::Freeform("list files".into())
        );
        assert_eq!(RecallKey::parse("-v").unwrap(), RecallKey::Freeform("-v".into()));
        assert_eq!(RecallKey::parse("1.5").unwrap(), RecallKey::Freeform("1.5".into()));
    }

    #[test]
    fn record_defaults_missing_fields() {
        let record: InteractionRecord =
            serde_json::from_str(r#"{"input": "a", "output": "b"}"#).unwrap();
        assert_eq!(record.name, DEFAULT_NAME);
        assert!(!record.favorite);
        assert!(!record.uid);
    }

    #[test]
    fn filter_mode_round_trips_through_str() {
        assert_eq!("passthrough".parse::<FilterMode>().unwrap(), FilterMode::Passthrough);
        assert_eq!("embedding".parse::<FilterMode>().unwrap(), FilterMode::EmbeddingRank);
        assert!("bm25".parse::<FilterMode>().is_err());
    }
}
