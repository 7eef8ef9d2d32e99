//! Inspect Module
//!
//! A line-oriented decoder used by the `metaflags` binary to look at the
//! flags of captured meta responses.
//!
//! Each input line is one response's flag tokens, separated by whitespace,
//! without the status code:
//!
//! ```text
//! input:   c4821 t300 Oreq1
//! output:  OK won=false stale=false hit=false opaque=req1 cas=4821 flags=0 last_access=0 size=0 ttl=300
//!
//! input:   Q12
//! output:  ERROR invalid flag: Q
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use metaflags::inspect::{inspect, InspectStats};
//! use std::sync::Arc;
//! use tokio::io::BufReader;
//!
//! let stats = Arc::new(InspectStats::new());
//! inspect(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), stats).await?;
//! ```

pub mod session;

// Re-export commonly used types
pub use session::{inspect, InspectError, InspectSession, InspectStats};
