//! Flag String Builder
//!
//! Serializes an ordered list of [`FlagDirective`]s into the space-joined
//! string that follows the key on a meta command line:
//!
//! ```text
//! mg foo v c t Oreq1\r\n
//!        └────┬─────┘
//!        flag string
//! ```
//!
//! Order is preserved exactly. No validation happens here: duplicate keys,
//! conflicting flags, or flags the target command does not accept are the
//! caller's concern.

use crate::protocol::directive::FlagDirective;
use bytes::{BufMut, BytesMut};
use std::fmt;

/// An ordered collection of flag directives.
///
/// # Example
///
/// ```
/// use metaflags::protocol::{FlagDirective, MetaFlags};
///
/// let flags = MetaFlags::new()
///     .with(FlagDirective::value())
///     .with(FlagDirective::cas())
///     .with(FlagDirective::opaque("req1"));
///
/// assert_eq!(flags.build(), "v c Oreq1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaFlags {
    directives: Vec<FlagDirective>,
}

impl MetaFlags {
    /// Creates an empty flag list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty flag list with room for `capacity` directives.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            directives: Vec::with_capacity(capacity),
        }
    }

    /// Appends a directive.
    pub fn push(&mut self, directive: FlagDirective) {
        self.directives.push(directive);
    }

    /// Appends a directive and returns `self`, for chaining.
    pub fn with(mut self, directive: FlagDirective) -> Self {
        self.directives.push(directive);
        self
    }

    /// Number of directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns true if there are no directives.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Iterates over the directives in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlagDirective> {
        self.directives.iter()
    }

    /// The directives as a slice.
    pub fn as_slice(&self) -> &[FlagDirective] {
        &self.directives
    }

    /// Serializes the directives into a space-joined flag string.
    pub fn build(&self) -> String {
        build_meta_flags(&self.directives)
    }

    /// Appends the flag string to an outgoing command buffer.
    ///
    /// Writes exactly the bytes [`build`](Self::build) would return, without
    /// a leading separator. Nothing is written for an empty list.
    pub fn build_into(&self, buf: &mut BytesMut) {
        buf.reserve(serialized_len(&self.directives));
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                buf.put_u8(b' ');
            }
            buf.put_u8(directive.key() as u8);
            if let Some(argument) = directive.argument() {
                buf.put_slice(argument.as_bytes());
            }
        }
    }
}

impl fmt::Display for MetaFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", directive)?;
        }
        Ok(())
    }
}

impl From<Vec<FlagDirective>> for MetaFlags {
    fn from(directives: Vec<FlagDirective>) -> Self {
        Self { directives }
    }
}

impl FromIterator<FlagDirective> for MetaFlags {
    fn from_iter<I: IntoIterator<Item = FlagDirective>>(iter: I) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

impl Extend<FlagDirective> for MetaFlags {
    fn extend<I: IntoIterator<Item = FlagDirective>>(&mut self, iter: I) {
        self.directives.extend(iter);
    }
}

impl<'a> IntoIterator for &'a MetaFlags {
    type Item = &'a FlagDirective;
    type IntoIter = std::slice::Iter<'a, FlagDirective>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

/// Serializes directives into a single space-joined flag string.
///
/// Each directive contributes its key immediately followed by its argument.
/// An empty slice yields an empty string.
pub fn build_meta_flags(directives: &[FlagDirective]) -> String {
    let mut out = String::with_capacity(serialized_len(directives));
    for (i, directive) in directives.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        directive.write_token(&mut out);
    }
    out
}

#[inline]
fn serialized_len(directives: &[FlagDirective]) -> usize {
    let tokens: usize = directives.iter().map(FlagDirective::token_len).sum();
    tokens + directives.len().saturating_sub(1)
}
