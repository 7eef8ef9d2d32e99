//! Response Flag Parser
//!
//! Decodes the flag tokens of one meta response line into a [`MetaResult`].
//!
//! ## Token Format
//!
//! Each token is a single key character immediately followed by zero or more
//! argument characters:
//!
//! ```text
//! c4821  t300  Oreq1  W
//! │└┬─┘  │└┬┘  │└┬─┘  │
//! │ arg  │ arg │ arg  no arg
//! key    key   key    key
//! ```
//!
//! The caller splits the response line on whitespace; this module only sees
//! the resulting tokens. Tokens are processed left to right and a repeated
//! key simply overwrites the earlier value. The first malformed or unknown
//! token ends decoding with an error.

use crate::protocol::result::MetaResult;
use std::num::ParseIntError;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur while decoding response flags.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// A token with no characters, so no key to dispatch on
    #[error("empty flag token")]
    EmptyToken,

    /// The token's key character is not a known response flag
    #[error("invalid flag: {0}")]
    UnknownFlag(char),

    /// A numeric flag carried an argument that does not fit its type
    #[error("malformed argument for flag {flag}: {argument:?}")]
    MalformedNumericArgument { flag: char, argument: String },
}

impl FlagError {
    /// The flag character the error refers to, if any.
    pub fn flag(&self) -> Option<char> {
        match self {
            FlagError::EmptyToken => None,
            FlagError::UnknownFlag(flag) => Some(*flag),
            FlagError::MalformedNumericArgument { flag, .. } => Some(*flag),
        }
    }
}

/// Result type for flag decoding.
pub type ParseResult<T> = Result<T, FlagError>;

/// Keys that may appear in a meta response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResponseFlag {
    Won = b'W',
    NotWon = b'Z',
    Stale = b'X',
    Key = b'k',
    Opaque = b'O',
    Cas = b'c',
    Flags = b'f',
    Hit = b'h',
    LastAccess = b'l',
    Size = b's',
    Ttl = b't',
}

impl ResponseFlag {
    /// Maps a key character to a response flag.
    pub fn from_char(c: char) -> Option<Self> {
        let flag = match c {
            'W' => ResponseFlag::Won,
            'Z' => ResponseFlag::NotWon,
            'X' => ResponseFlag::Stale,
            'k' => ResponseFlag::Key,
            'O' => ResponseFlag::Opaque,
            'c' => ResponseFlag::Cas,
            'f' => ResponseFlag::Flags,
            'h' => ResponseFlag::Hit,
            'l' => ResponseFlag::LastAccess,
            's' => ResponseFlag::Size,
            't' => ResponseFlag::Ttl,
            _ => return None,
        };
        Some(flag)
    }

    #[inline]
    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

/// Decodes response flag tokens into a [`MetaResult`].
///
/// # Example
///
/// ```
/// use metaflags::protocol::parse_meta_flags;
///
/// let result = parse_meta_flags(&["O123", "k456", "t3600", "s10"]).unwrap();
/// assert_eq!(result.opaque, "123");
/// assert_eq!(result.key, "456");
/// assert_eq!(result.ttl, 3600);
/// assert_eq!(result.size, 10);
/// ```
pub fn parse_meta_flags<S: AsRef<str>>(tokens: &[S]) -> ParseResult<MetaResult> {
    let mut result = MetaResult::default();

    for token in tokens {
        let token = token.as_ref();
        if let Err(e) = apply_token(&mut result, token) {
            debug!(token = token, error = %e, "Failed to decode meta flag");
            return Err(e);
        }
        trace!(token = token, "Decoded meta flag");
    }

    Ok(result)
}

/// Splits a token into its key and argument, then updates the matching field.
fn apply_token(result: &mut MetaResult, token: &str) -> ParseResult<()> {
    let mut chars = token.chars();
    let key = chars.next().ok_or(FlagError::EmptyToken)?;
    let argument = chars.as_str();

    let flag = ResponseFlag::from_char(key).ok_or(FlagError::UnknownFlag(key))?;

    match flag {
        ResponseFlag::Won => result.won = true,
        ResponseFlag::NotWon => result.won = false,
        ResponseFlag::Stale => result.stale = true,
        ResponseFlag::Key => result.key = argument.to_string(),
        ResponseFlag::Opaque => result.opaque = argument.to_string(),
        // Presence is only recorded once the value has parsed.
        ResponseFlag::Cas => result.cas_token = Some(parse_number(key, argument)?),
        ResponseFlag::Flags => result.flags = parse_unsigned(key, argument)?,
        ResponseFlag::Hit => {
            if argument.is_empty() {
                return Err(malformed(key, argument));
            }
            result.hit = argument.starts_with('1');
        }
        ResponseFlag::LastAccess => result.last_access = parse_unsigned(key, argument)?,
        ResponseFlag::Size => result.size = parse_unsigned(key, argument)?,
        ResponseFlag::Ttl => result.ttl = parse_unsigned(key, argument)?,
    }

    Ok(())
}

/// Parses a base-10 argument into the flag's numeric type.
#[inline]
fn parse_number<T>(key: char, argument: &str) -> ParseResult<T>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    argument.parse().map_err(|_| malformed(key, argument))
}

/// Like [`parse_number`], but only bare digits are accepted: no sign at all.
#[inline]
fn parse_unsigned<T>(key: char, argument: &str) -> ParseResult<T>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    if !argument.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(key, argument));
    }
    parse_number(key, argument)
}

fn malformed(key: char, argument: &str) -> FlagError {
    FlagError::MalformedNumericArgument {
        flag: key,
        argument: argument.to_string(),
    }
}
