//! Request-Side Flag Directives
//!
//! Every meta command (`mg`, `ms`, `md`, `ma`) carries an ordered list of
//! single-character flags after the key. Some flags are plain toggles (`v`,
//! `q`), some ask the server to return a piece of item metadata (`c`, `t`),
//! and some carry an argument (`T3600`, `Oabc`).
//!
//! ## Flag Summary
//!
//! | Key | Constructor                        | Commands         | Argument          |
//! |-----|------------------------------------|------------------|-------------------|
//! | `b` | [`FlagDirective::binary`]          | mg ms md ma      | none              |
//! | `c` | [`FlagDirective::cas`]             | mg ms ma         | none              |
//! | `f` | [`FlagDirective::client_flags`]    | mg               | none              |
//! | `h` | [`FlagDirective::hit`]             | mg               | none              |
//! | `k` | [`FlagDirective::return_key`]      | mg ms md ma      | none              |
//! | `l` | [`FlagDirective::last_access`]     | mg               | none              |
//! | `O` | [`FlagDirective::opaque`]          | mg ms md ma      | opaque token      |
//! | `q` | [`FlagDirective::quiet`]           | mg ms md ma      | none              |
//! | `s` | [`FlagDirective::size`]            | mg               | none              |
//! | `t` | [`FlagDirective::ttl`]             | mg ma            | none              |
//! | `u` | [`FlagDirective::no_bump`]         | mg               | none              |
//! | `v` | [`FlagDirective::value`]           | mg ma            | none              |
//! | `N` | [`FlagDirective::vivify`]          | mg ma            | TTL seconds       |
//! | `R` | [`FlagDirective::recache`]         | mg               | TTL seconds       |
//! | `T` | [`FlagDirective::set_ttl`]         | mg ms md ma      | TTL seconds       |
//! | `C` | [`FlagDirective::compare_cas`]     | ms md ma         | CAS value         |
//! | `F` | [`FlagDirective::set_flags`]       | ms               | 32-bit flags      |
//! | `I` | [`FlagDirective::invalidate`]      | ms md            | none              |
//! | `M` | [`FlagDirective::mode`]            | ms ma            | [`Mode`]          |
//! | `J` | [`FlagDirective::initial_value`]   | ma               | initial value     |
//! | `D` | [`FlagDirective::delta`]           | ma               | delta             |
//!
//! Directives can only be created through these constructors, so a flag key
//! the protocol does not define can never reach the builder.

use std::fmt;

/// Keys accepted on a meta command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RequestFlag {
    Binary = b'b',
    ReturnCas = b'c',
    ReturnFlags = b'f',
    ReturnHit = b'h',
    ReturnKey = b'k',
    ReturnLastAccess = b'l',
    Opaque = b'O',
    Quiet = b'q',
    ReturnSize = b's',
    ReturnTtl = b't',
    NoBump = b'u',
    ReturnValue = b'v',
    Vivify = b'N',
    Recache = b'R',
    SetTtl = b'T',
    CompareCas = b'C',
    SetFlags = b'F',
    Invalidate = b'I',
    Mode = b'M',
    InitialValue = b'J',
    Delta = b'D',
}

impl RequestFlag {
    /// The key character as it appears on the wire.
    #[inline]
    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

impl fmt::Display for RequestFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Mode switch carried by the `M` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// `ms`: store only if the item does not exist.
    Add,
    /// `ms`: append the data to an existing item.
    Append,
    /// `ms`: prepend the data to an existing item.
    Prepend,
    /// `ms`: store only if the item already exists.
    Replace,
    /// `ms`: plain set (the default).
    Set,
    /// `ma`: increment (the default).
    Increment,
    /// `ma`: decrement.
    Decrement,
}

impl Mode {
    /// The single-letter mode token.
    pub fn as_char(self) -> char {
        match self {
            Mode::Add => 'E',
            Mode::Append => 'A',
            Mode::Prepend => 'P',
            Mode::Replace => 'R',
            Mode::Set => 'S',
            Mode::Increment => 'I',
            Mode::Decrement => 'D',
        }
    }
}

/// A single request-side flag: a key plus an optional argument.
///
/// # Example
///
/// ```
/// use metaflags::protocol::FlagDirective;
///
/// assert_eq!(FlagDirective::opaque("abc123").token(), "Oabc123");
/// assert_eq!(FlagDirective::set_flags(42).token(), "F42");
/// assert_eq!(FlagDirective::compare_cas(-7).token(), "C-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagDirective {
    key: RequestFlag,
    argument: Option<String>,
}

impl FlagDirective {
    fn toggle(key: RequestFlag) -> Self {
        Self {
            key,
            argument: None,
        }
    }

    fn with_argument(key: RequestFlag, argument: String) -> Self {
        Self {
            key,
            argument: Some(argument),
        }
    }

    /// `b`: interpret the key as base64-encoded binary.
    ///
    /// Accepted by `mg`, `ms`, `md` and `ma`.
    pub fn binary() -> Self {
        Self::toggle(RequestFlag::Binary)
    }

    /// `c`: return the item's CAS token.
    ///
    /// Accepted by `mg`, `ms` and `ma`.
    pub fn cas() -> Self {
        Self::toggle(RequestFlag::ReturnCas)
    }

    /// `f`: return the client flags.
    ///
    /// Accepted by `mg`.
    pub fn client_flags() -> Self {
        Self::toggle(RequestFlag::ReturnFlags)
    }

    /// `h`: return whether the item has been hit before, as `0` or `1`.
    ///
    /// Accepted by `mg`.
    pub fn hit() -> Self {
        Self::toggle(RequestFlag::ReturnHit)
    }

    /// `k`: return the key.
    ///
    /// Accepted by `mg`, `ms`, `md` and `ma`.
    pub fn return_key() -> Self {
        Self::toggle(RequestFlag::ReturnKey)
    }

    /// `l`: return seconds since the item was last accessed.
    ///
    /// Accepted by `mg`.
    pub fn last_access() -> Self {
        Self::toggle(RequestFlag::ReturnLastAccess)
    }

    /// `O(token)`: opaque value, echoed back unchanged in the response.
    ///
    /// Accepted by `mg`, `ms`, `md` and `ma`. The token must not contain
    /// whitespace.
    pub fn opaque(token: impl Into<String>) -> Self {
        let token = token.into();
        debug_assert!(
            !token.chars().any(char::is_whitespace),
            "opaque token must not contain whitespace"
        );
        Self::with_argument(RequestFlag::Opaque, token)
    }

    /// `q`: noreply semantics for return codes.
    ///
    /// Accepted by `mg`, `ms`, `md` and `ma`.
    pub fn quiet() -> Self {
        Self::toggle(RequestFlag::Quiet)
    }

    /// `s`: return the item size.
    ///
    /// Accepted by `mg`.
    pub fn size() -> Self {
        Self::toggle(RequestFlag::ReturnSize)
    }

    /// `t`: return the remaining TTL in seconds (`-1` for unlimited).
    ///
    /// Accepted by `mg` and `ma`.
    pub fn ttl() -> Self {
        Self::toggle(RequestFlag::ReturnTtl)
    }

    /// `u`: don't bump the item in the LRU.
    ///
    /// Accepted by `mg`.
    pub fn no_bump() -> Self {
        Self::toggle(RequestFlag::NoBump)
    }

    /// `v`: return the item value in a data block.
    ///
    /// Accepted by `mg` and `ma`.
    pub fn value() -> Self {
        Self::toggle(RequestFlag::ReturnValue)
    }

    /// `N(ttl)`: vivify on miss, creating the item with the given TTL.
    ///
    /// Accepted by `mg` and `ma`.
    pub fn vivify(ttl: u64) -> Self {
        Self::with_argument(RequestFlag::Vivify, ttl.to_string())
    }

    /// `R(ttl)`: win the recache if the remaining TTL is below the given value.
    ///
    /// Accepted by `mg`.
    pub fn recache(ttl: u64) -> Self {
        Self::with_argument(RequestFlag::Recache, ttl.to_string())
    }

    /// `T(ttl)`: update the remaining TTL.
    ///
    /// Accepted by `mg`, `ms`, `md` and `ma`.
    pub fn set_ttl(ttl: u64) -> Self {
        Self::with_argument(RequestFlag::SetTtl, ttl.to_string())
    }

    /// `C(cas)`: compare the CAS value before storing or deleting.
    ///
    /// Accepted by `ms`, `md` and `ma`.
    pub fn compare_cas(cas: i64) -> Self {
        Self::with_argument(RequestFlag::CompareCas, cas.to_string())
    }

    /// `F(flags)`: set the 32-bit client flags.
    ///
    /// Accepted by `ms`.
    pub fn set_flags(flags: u32) -> Self {
        Self::with_argument(RequestFlag::SetFlags, flags.to_string())
    }

    /// `I`: invalidate.
    ///
    /// With `ms`, the item is set-to-invalid if the supplied CAS is older than
    /// the item's CAS. With `md`, the item is marked stale and its CAS bumped.
    pub fn invalidate() -> Self {
        Self::toggle(RequestFlag::Invalidate)
    }

    /// `M(mode)`: switch the command's mode.
    ///
    /// Accepted by `ms` (add, append, prepend, replace, set) and `ma`
    /// (increment, decrement).
    pub fn mode(mode: Mode) -> Self {
        Self::with_argument(RequestFlag::Mode, mode.as_char().to_string())
    }

    /// `J(value)`: initial value used when an item is auto-created on miss.
    ///
    /// Accepted by `ma`. The server default is 0.
    pub fn initial_value(value: u64) -> Self {
        Self::with_argument(RequestFlag::InitialValue, value.to_string())
    }

    /// `D(delta)`: delta to apply.
    ///
    /// Accepted by `ma`. The server default is 1.
    pub fn delta(delta: u64) -> Self {
        Self::with_argument(RequestFlag::Delta, delta.to_string())
    }

    /// The flag key.
    pub fn key(&self) -> RequestFlag {
        self.key
    }

    /// The argument, if the flag carries one.
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The wire token: the key immediately followed by the argument.
    pub fn token(&self) -> String {
        let mut token = String::with_capacity(self.token_len());
        self.write_token(&mut token);
        token
    }

    pub(crate) fn write_token(&self, out: &mut String) {
        out.push(self.key.as_char());
        if let Some(argument) = &self.argument {
            out.push_str(argument);
        }
    }

    /// Length of the wire token in bytes.
    pub(crate) fn token_len(&self) -> usize {
        1 + self.argument.as_ref().map_or(0, String::len)
    }
}

impl fmt::Display for FlagDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(argument) = &self.argument {
            f.write_str(argument)?;
        }
        Ok(())
    }
}
