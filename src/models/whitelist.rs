//! Whitelist construction and membership evaluation.

use super::ipv4::ipv4_to_int;
use super::range::{parse_range_token, Range};
use crate::error::WhitelistResult;

/// Delimiter between whitelist elements.
pub const SEPARATOR: char = ',';

/// The access policy held for the lifetime of the service.
///
/// Built once at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Whitelist {
    /// No whitelist configured; every address is allowed.
    Unrestricted,
    /// Ranges sorted ascending by `(low, high)`. May be empty when the
    /// configured list held only separators, in which case nothing is allowed.
    Ranges(Vec<Range>),
    /// The configured whitelist was invalid; nothing is allowed until fixed.
    DenyAll { reason: String },
}

impl Whitelist {
    /// Decide whether an already validated dotted-quad is allowed.
    pub fn allows(&self, addr: &str) -> bool {
        match self {
            Whitelist::Unrestricted => true,
            Whitelist::DenyAll { .. } => false,
            Whitelist::Ranges(ranges) => is_whitelisted(addr, ranges),
        }
    }

    /// Short policy description for startup logging.
    pub fn describe(&self) -> String {
        match self {
            Whitelist::Unrestricted => "allow all".to_string(),
            Whitelist::DenyAll { reason } => format!("deny all ({reason})"),
            Whitelist::Ranges(ranges) => format!(
                "{} range(s): {}",
                ranges.len(),
                ranges
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<String>>()
                    .join(",")
            ),
        }
    }
}

/// Build a [`Whitelist`] from a comma-separated list of addresses and ranges.
///
/// An absent or blank `spec` gives [`Whitelist::Unrestricted`]. Elements are
/// trimmed and empty ones skipped, so stray commas and spaces are tolerated.
/// The first bad element fails the whole build.
///
/// # Examples
/// ```
/// use ip_whitelist::models::{build_whitelist, Range, Whitelist};
/// let w = build_whitelist(Some("2.2.2.2, 1.1.1.1")).unwrap();
/// assert_eq!(
///     w,
///     Whitelist::Ranges(vec![
///         Range { low: 16843009, high: 16843009 },
///         Range { low: 33686018, high: 33686018 },
///     ])
/// );
/// ```
pub fn build_whitelist(spec: Option<&str>) -> WhitelistResult<Whitelist> {
    let spec = match spec {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            log::debug!("build_whitelist(spec={spec:?}) ==> Unrestricted");
            return Ok(Whitelist::Unrestricted);
        }
    };

    let mut ranges = spec
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_range_token)
        .collect::<WhitelistResult<Vec<Range>>>()?;
    // stable; derived Ord is numeric (low, high)
    ranges.sort();

    log::debug!("build_whitelist(spec={spec:?}) ==> {ranges:?}");
    Ok(Whitelist::Ranges(ranges))
}

/// Return true if `addr` lies in at least one of `ranges`, bounds inclusive.
///
/// `addr` must already be a valid dotted-quad and `ranges` sorted ascending
/// by `low`. Ranges may overlap.
pub fn is_whitelisted(addr: &str, ranges: &[Range]) -> bool {
    debug_assert!(
        ranges.windows(2).all(|w| w[0] <= w[1]),
        "is_whitelisted called with unsorted ranges"
    );
    let n = ipv4_to_int(addr);
    // Once `low` passes `n` no later range can hold it.
    let retval = ranges
        .iter()
        .take_while(|r| r.low <= n)
        .any(|r| r.contains(n));
    log::trace!("is_whitelisted(addr={addr:?}, ranges={ranges:?}) ==> {retval}");
    retval
}
