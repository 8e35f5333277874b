//! Whitelist evaluation engine.
//!
//! - [`ipv4`] - dotted-quad validation and numeric conversion
//! - [`range`] - [`Range`] and the single-token parser
//! - [`whitelist`] - [`Whitelist`] construction and membership tests

mod ipv4;
mod range;
mod whitelist;

// Re-export public types
pub use ipv4::{int_to_ipv4, ipv4_to_int, validate_ipv4, MAX_OCTET};
pub use range::{parse_range_token, Range, RANGE_SEPARATOR};
pub use whitelist::{build_whitelist, is_whitelisted, Whitelist, SEPARATOR};
