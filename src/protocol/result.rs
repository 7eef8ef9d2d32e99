//! Decoded Response Flags
//!
//! A meta response line such as `HD c42 t30 Oreq1` carries typed return
//! flags after its status code. [`MetaResult`] holds the decoded values.

use crate::protocol::parser::{parse_meta_flags, ParseResult};
use std::fmt;

/// Typed record of the flags returned in one meta response.
///
/// Fields not mentioned in the response keep their default value. The CAS
/// token is optional so that "absent" and "present with value 0" differ.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaResult {
    /// `W` sets this, `Z` clears it; the last one seen wins.
    pub won: bool,
    /// `X`: the item is stale.
    pub stale: bool,
    /// `k`: the item key.
    pub key: String,
    /// `O`: the opaque token echoed from the request.
    pub opaque: String,
    /// `c`: the item's CAS token.
    pub cas_token: Option<i64>,
    /// `f`: client flags.
    pub flags: u32,
    /// `h`: whether the item had been hit before.
    pub hit: bool,
    /// `l`: seconds since last access.
    pub last_access: u64,
    /// `s`: item size in bytes.
    pub size: u64,
    /// `t`: remaining TTL in seconds.
    pub ttl: u64,
}

impl MetaResult {
    /// Decodes a list of response flag tokens.
    ///
    /// Shorthand for [`parse_meta_flags`].
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> ParseResult<Self> {
        parse_meta_flags(tokens)
    }
}

impl fmt::Display for MetaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "won={} stale={} hit={}", self.won, self.stale, self.hit)?;
        if !self.key.is_empty() {
            write!(f, " key={}", self.key)?;
        }
        if !self.opaque.is_empty() {
            write!(f, " opaque={}", self.opaque)?;
        }
        match self.cas_token {
            Some(cas) => write!(f, " cas={}", cas)?,
            None => f.write_str(" cas=(none)")?,
        }
        write!(
            f,
            " flags={} last_access={} size={} ttl={}",
            self.flags, self.last_access, self.size, self.ttl
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let result = MetaResult::default();
        assert!(!result.won);
        assert!(!result.stale);
        assert!(!result.hit);
        assert!(result.key.is_empty());
        assert!(result.opaque.is_empty());
        assert_eq!(result.cas_token, None);
        assert_eq!(result.flags, 0);
        assert_eq!(result.last_access, 0);
        assert_eq!(result.size, 0);
        assert_eq!(result.ttl, 0);
    }

    #[test]
    fn test_cas_zero_differs_from_absent() {
        let absent = MetaResult::default();
        let zero = MetaResult {
            cas_token: Some(0),
            ..Default::default()
        };
        assert_ne!(absent, zero);
    }

    #[test]
    fn test_from_tokens() {
        let result = MetaResult::from_tokens(&["c99", "s5"]).unwrap();
        assert_eq!(result.cas_token, Some(99));
        assert_eq!(result.size, 5);
    }

    #[test]
    fn test_display() {
        let result = MetaResult {
            won: true,
            key: "foo".to_string(),
            cas_token: Some(12),
            ttl: 30,
            ..Default::default()
        };
        assert_eq!(
            result.to_string(),
            "won=true stale=false hit=false key=foo cas=12 flags=0 last_access=0 size=0 ttl=30"
        );

        assert_eq!(
            MetaResult::default().to_string(),
            "won=false stale=false hit=false cas=(none) flags=0 last_access=0 size=0 ttl=0"
        );
    }
}
