use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(3000),
            user_agent: format!("pokedex-lookup/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A user query: trimmed and lower-cased, otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query(String);

impl Query {
    pub fn from_input(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: String,
    pub value: u32,
}

/// The part of a PokéAPI `pokemon` payload the card actually shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub name: String,
    pub id: u32,
    pub height: u32,
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub abilities: Vec<String>,
    pub types: Vec<String>,
    pub stats: Vec<StatEntry>,
    pub sprite_url: Option<String>,
    pub artwork_url: Option<String>,
}

/// Lookup failure taxonomy. Every failure is caught at the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LookupError {
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP error, status: {0}")]
    HttpError(u16),

    #[error("invalid Pokémon data received: {0}")]
    InvalidPayload(String),

    #[error("network error: {0}")]
    Network(String),

    /// The pending lookup was aborted because a newer one started.
    #[error("lookup superseded by a newer request")]
    Superseded,
}

impl LookupError {
    /// Whether this failure is subject to once-per-streak alert suppression.
    pub fn is_suppressible(&self) -> bool {
        matches!(
            self,
            LookupError::HttpError(_) | LookupError::InvalidPayload(_) | LookupError::Network(_)
        )
    }
}

/// User-visible alert with a fixed message per failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alert {
    TimedOut,
    FetchFailed,
}

impl Alert {
    pub fn message(self) -> &'static str {
        match self {
            Alert::TimedOut => "Request timed out. Please try again.",
            Alert::FetchFailed => {
                "Failed to fetch Pokémon data. Please check the Pokémon name or id and try again."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LookupEvent {
    Started {
        query: Query,
    },
    Completed {
        // Boxed to keep the enum small.
        result: Box<LookupResult>,
    },
    Failed {
        query: Query,
        error: LookupError,
    },
    Alert(Alert),
}

/// One successful lookup as printed in JSON mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRecord {
    pub fetched_at_utc: String,
    pub query: Query,
    pub result: LookupResult,
}

impl LookupRecord {
    pub fn new(query: Query, result: LookupResult) -> Self {
        Self {
            fetched_at_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            query,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_trimmed_and_lowercased() {
        assert_eq!(Query::from_input("  PikaChu \n").as_str(), "pikachu");
        assert_eq!(Query::from_input("   ").as_str(), "");
    }

    #[test]
    fn only_fetch_failures_are_suppressible() {
        assert!(!LookupError::Timeout(3000).is_suppressible());
        assert!(!LookupError::Superseded.is_suppressible());
        assert!(LookupError::HttpError(404).is_suppressible());
        assert!(LookupError::InvalidPayload("no name".into()).is_suppressible());
        assert!(LookupError::Network("refused".into()).is_suppressible());
    }

    #[test]
    fn config_timeout_serializes_as_humantime() {
        let cfg = LookupConfig::default();
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["timeout"], "3s");
        assert_eq!(json["base_url"], DEFAULT_BASE_URL);
    }
}
