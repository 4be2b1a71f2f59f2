//! DID syntax.
//!
//! [`is_did`] decides whether a service endpoint points at another agent
//! (a mediator) or at a transport URI, so it must never accept `http(s)`
//! strings.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const SEGMENT: &str = r"(?:[A-Za-z0-9._-]|%[0-9A-Fa-f]{2})+";

static DID_REGEX: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"^did:([a-z0-9]+):({SEGMENT}(?::{SEGMENT})*={{0,2}})$");
    Regex::new(&pattern).expect("DID pattern is valid")
});

/// Whether `value` is a syntactically valid DID.
#[must_use]
pub fn is_did(value: &str) -> bool {
    DID_REGEX.is_match(value)
}

/// A parsed DID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Did {
    method: String,
    method_id: String,
}

impl Did {
    /// Parses a DID string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDid`] when `value` does not match the DID grammar.
    pub fn parse(value: &str) -> Result<Self> {
        let captures = DID_REGEX
            .captures(value)
            .ok_or_else(|| Error::InvalidDid(value.to_string()))?;

        Ok(Self {
            method: captures[1].to_string(),
            method_id: captures[2].to_string(),
        })
    }

    /// The DID method, e.g. `peer`.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Everything after the method.
    #[must_use]
    pub fn method_id(&self) -> &str {
        &self.method_id
    }
}

impl FromStr for Did {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}", self.method, self.method_id)
    }
}
