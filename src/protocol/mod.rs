//! Meta Protocol Flag Codec
//!
//! This module implements the flag sub-language of the memcached meta text
//! protocol, in both directions.
//!
//! ## Overview
//!
//! Every meta command carries an ordered list of single-character flags,
//! and every meta response carries a matching list of return flags:
//!
//! ```text
//! request:   mg foo v c t Oreq1\r\n
//! response:  VA 5 c4821 t300 Oreq1\r\n
//! ```
//!
//! Framing the line, sending it and splitting the response are left to the
//! transport. This module only turns directives into a flag string and flag
//! tokens into a [`MetaResult`].
//!
//! ## Modules
//!
//! - `directive`: Request-side flags and their constructors
//! - `builder`: Serialization of directives into a flag string
//! - `result`: The decoded response record
//! - `parser`: Decoding of response flag tokens
//!
//! ## Example
//!
//! ```
//! use metaflags::protocol::{parse_meta_flags, FlagDirective, MetaFlags};
//!
//! let flags = MetaFlags::new()
//!     .with(FlagDirective::value())
//!     .with(FlagDirective::cas())
//!     .with(FlagDirective::opaque("req1"));
//! assert_eq!(flags.build(), "v c Oreq1");
//!
//! let result = parse_meta_flags(&["c4821", "Oreq1"]).unwrap();
//! assert_eq!(result.cas_token, Some(4821));
//! assert_eq!(result.opaque, "req1");
//! ```

pub mod builder;
pub mod directive;
pub mod parser;
pub mod result;

// Re-export commonly used types for convenience
pub use builder::{build_meta_flags, MetaFlags};
pub use directive::{FlagDirective, Mode, RequestFlag};
pub use parser::{parse_meta_flags, FlagError, ParseResult, ResponseFlag};
pub use result::MetaResult;
