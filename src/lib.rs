//! # metaflags - Flag Codec for the memcached Meta Protocol
//!
//! The memcached meta commands (`mg`, `ms`, `md`, `ma`) replace fixed
//! positional arguments with an ordered list of single-character flags.
//! This crate builds the flag string for a request and decodes the flags
//! returned in a response.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   directives   ┌─────────────┐   "v c t Oreq1"
//! │ Command      │───────────────>│  MetaFlags  │──────────────────> transport
//! │ layer        │                │  (builder)  │
//! └──────────────┘                └─────────────┘
//!        ▲
//!        │ MetaResult            ┌─────────────┐   ["c4821","t300"]
//!        └───────────────────────│   parser    │<────────────────── transport
//!                                └─────────────┘
//! ```
//!
//! Both halves are pure functions: no I/O, no shared state. Connection
//! handling, line framing and data blocks belong to the caller.
//!
//! ## Quick Start
//!
//! ```
//! use metaflags::{parse_meta_flags, FlagDirective, MetaFlags};
//!
//! let flags = MetaFlags::new()
//!     .with(FlagDirective::cas())
//!     .with(FlagDirective::ttl());
//! assert_eq!(flags.build(), "c t");
//!
//! let result = parse_meta_flags(&["c12", "t30"]).unwrap();
//! assert_eq!(result.cas_token, Some(12));
//! assert_eq!(result.ttl, 30);
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: Flag directives, the builder, the result record and the parser
//! - [`inspect`]: Line-oriented decode session behind the `metaflags` binary

pub mod inspect;
pub mod protocol;

// Re-export commonly used types for convenience
pub use protocol::{
    build_meta_flags, parse_meta_flags, FlagDirective, FlagError, MetaFlags, MetaResult, Mode,
};

/// Version of metaflags
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
