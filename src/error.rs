//! Errors raised while building a whitelist from its textual form.

use thiserror::Error;

pub type WhitelistResult<T> = Result<T, WhitelistError>;

/// Configuration error in an `IP_WHITELIST` specification.
///
/// All variants are startup-time errors; a request never produces one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WhitelistError {
    /// An address token is not a strict dotted-quad.
    #[error("Invalid Whitelist: \"{0}\" is not a valid IPv4 IP address.")]
    NotIpv4(String),
    /// A range token contains more than one `-`.
    #[error("Invalid Whitelist: \"{0}\" must only contain one \"-\" delimiter.")]
    TooManyDelimiters(String),
    /// The upper bound of a range is below its lower bound.
    #[error("Invalid Whitelist: \"{max}\" must be greater than or equal to \"{min}\".")]
    RangeOrder { min: String, max: String },
}
