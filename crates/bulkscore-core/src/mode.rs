//! Scoring modes and lookup-key extraction.
//!
//! A run scores either companies (by domain) or persons (by email). The mode
//! is chosen once at startup and carries everything that differs between the
//! two: the API endpoint, the query parameter, and how a raw cell value turns
//! into the key used for deduplication.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

/// Optional `@`, then a host label (hyphens allowed) and a suffix.
static DOMAIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@?(?P<domain>[\w-]+\.\w+)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreMode {
    Domain,
    Email,
}

impl ScoreMode {
    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            ScoreMode::Domain => "companies",
            ScoreMode::Email => "persons",
        }
    }

    /// Query parameter carrying the lookup key.
    #[must_use]
    pub fn param(self) -> &'static str {
        match self {
            ScoreMode::Domain => "domain",
            ScoreMode::Email => "email",
        }
    }

    /// Derive the lookup key for a raw cell value.
    ///
    /// Returns `None` when the value holds nothing that looks like an address.
    /// In domain mode, a value containing `@` is only searched after the last
    /// `@`, so `first.last@foo.com` yields `foo.com`. In email mode the whole
    /// value is searched and, on a match, kept as the key with line breaks
    /// collapsed to spaces.
    #[must_use]
    pub fn derive_key(self, raw: &str) -> Option<LookupKey> {
        let raw = raw.trim();
        match self {
            ScoreMode::Domain => {
                let haystack = raw.rfind('@').map_or(raw, |at| &raw[at..]);
                let captures = DOMAIN_PATTERN.captures(haystack)?;
                let domain = captures.name("domain")?.as_str();
                Some(LookupKey(domain.to_string()))
            }
            ScoreMode::Email => {
                if !DOMAIN_PATTERN.is_match(raw) {
                    return None;
                }
                let single_line = raw.replace("\r\n", " ").replace(['\r', '\n'], " ");
                Some(LookupKey(single_line))
            }
        }
    }
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

impl FromStr for ScoreMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(ScoreMode::Domain),
            "email" => Ok(ScoreMode::Email),
            other => Err(ConfigError::UnknownScoreMode(other.to_string())),
        }
    }
}

/// A domain or email used to deduplicate scoring requests within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LookupKey {
    fn from(value: &str) -> Self {
        LookupKey(value.to_string())
    }
}
