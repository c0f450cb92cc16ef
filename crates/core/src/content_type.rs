//! Content-type parsing and the supported-type whitelist.
//!
//! [`is_supported_type`] is the single source of truth for whether a
//! `Content-Type` value can be stored. It is consulted both at fragment
//! construction and at the HTTP boundary, and it fails closed: anything
//! that does not parse is unsupported.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FragmentError;

/// Primary mime types the service knows how to store.
pub const SUPPORTED_TYPES: &[&str] = &["text/plain"];

/// A parsed `Content-Type` value: the primary `type/subtype` plus an
/// optional `charset` parameter.
///
/// Only the primary mime takes part in support and match decisions;
/// parameters are carried for the response `Content-Type` header but
/// never compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    mime: String,
    charset: Option<String>,
}

impl ContentType {
    /// Parse a `Content-Type` expression such as `text/plain` or
    /// `text/plain; charset=utf-8`.
    pub fn parse(value: &str) -> Result<Self, FragmentError> {
        let mut parts = value.split(';');
        let mime = parts.next().unwrap_or_default().trim().to_ascii_lowercase();

        let Some((kind, subtype)) = mime.split_once('/') else {
            return Err(invalid(value));
        };
        if !is_token(kind) || !is_token(subtype) {
            return Err(invalid(value));
        }

        let mut charset = None;
        for param in parts {
            let Some((name, val)) = param.split_once('=') else {
                return Err(invalid(value));
            };
            let val = val.trim().trim_matches('"');
            if val.is_empty() {
                return Err(invalid(value));
            }
            if name.trim().eq_ignore_ascii_case("charset") {
                charset = Some(val.to_ascii_lowercase());
            }
            // Other parameters are dropped; only charset is retained.
        }

        Ok(Self { mime, charset })
    }

    /// The primary `type/subtype`, parameters stripped.
    pub fn mime_type(&self) -> &str {
        &self.mime
    }

    /// The `charset` parameter, if one was given.
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// True for `text/*` mime types.
    pub fn is_text(&self) -> bool {
        self.mime.starts_with("text/")
    }

    /// True when the primary mime is in [`SUPPORTED_TYPES`].
    pub fn is_supported(&self) -> bool {
        SUPPORTED_TYPES.contains(&self.mime.as_str())
    }

    /// Mime types this content can be converted into, as a function of the
    /// primary mime alone.
    pub fn formats(&self) -> Vec<&'static str> {
        match self.mime.as_str() {
            "text/plain" => vec!["text/plain"],
            _ => Vec::new(),
        }
    }
}

/// True iff `value` parses and its primary mime is supported for storage.
///
/// Malformed values are unsupported, never an error.
pub fn is_supported_type(value: &str) -> bool {
    ContentType::parse(value).is_ok_and(|ct| ct.is_supported())
}

fn invalid(value: &str) -> FragmentError {
    FragmentError::Validation(format!("invalid content type: {value:?}"))
}

/// An HTTP token per RFC 9110: at least one tchar.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.charset {
            Some(cs) => write!(f, "{}; charset={cs}", self.mime),
            None => f.write_str(&self.mime),
        }
    }
}

impl FromStr for ContentType {
    type Err = FragmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
