//! xmlstats - single-pass XML document checker
//!
//! Scans an XML document once and, in the same pass:
//!
//! - checks that it is well formed (restricted dialect, see [`scanner`])
//! - counts letters and digits in text content
//! - collects intra-document links (`<a href="#id">`) and element ids, and
//!   reports the links whose target id is never declared
//!
//! # Quick Start
//!
//! ```rust
//! use xmlstats::compute_stats;
//!
//! let xml = r##"<?xml version="1.0"?><doc><p id="a">Hi</p><p><a href="#a">x</a></p></doc>"##;
//!
//! let stats = compute_stats(xml).expect("well-formed document");
//! assert_eq!(stats.letter_count, 3);
//! assert_eq!(stats.total_link_count, 1);
//! assert_eq!(stats.broken_link_count, 0);
//! ```
//!
//! Malformed input fails with a positioned [`ParseError`]:
//!
//! ```rust
//! use xmlstats::{compute_stats, ParseError};
//!
//! let err = compute_stats(r#"<?xml version="1.0"?><a id="x"><b></a>"#).unwrap_err();
//! assert!(matches!(err, ParseError::TagMismatch { .. }));
//! ```
//!
//! Letters are counted for Latin, Greek and Russian Cyrillic text plus ASCII
//! digits; see [`charclass::Script`].

pub mod charclass;
pub mod error;
pub mod input_stream;
pub mod links;
mod parse_context;
pub mod scanner;
pub mod state;
pub mod stats;

// Document retrieval for the command-line front end
#[cfg(not(target_arch = "wasm32"))]
pub mod source;

// WASM bindings (only when compiling for wasm32)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export main API
pub use error::{ContextWindow, ParseError};
pub use links::{find_broken_links, LinkCollector};
pub use scanner::{compute_stats, scan, Scanner};
pub use state::ParserState;
pub use stats::{ScanReport, XmlStats};

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
