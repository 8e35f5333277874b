//! Inclusive numeric address range and its token parser.

use super::ipv4::{int_to_ipv4, ipv4_to_int, validate_ipv4};
use crate::error::{WhitelistError, WhitelistResult};
use serde::Serialize;

/// Delimiter between the two addresses of a range token.
pub const RANGE_SEPARATOR: char = '-';

/// Inclusive `[low, high]` range of numeric IPv4 addresses, `low <= high`.
///
/// Field order matters: the derived `Ord` compares `low` first, then `high`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub low: u32,
    pub high: u32,
}

impl Range {
    /// Range covering a single address.
    pub fn single(addr: u32) -> Self {
        Range {
            low: addr,
            high: addr,
        }
    }

    pub fn contains(&self, addr: u32) -> bool {
        let retval = addr >= self.low && addr <= self.high;
        log::trace!(
            "contains(n={addr}, min={low}, max={high}) ==> {retval}",
            low = self.low,
            high = self.high
        );
        retval
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.low == self.high {
            write!(f, "{}", int_to_ipv4(self.low))
        } else {
            write!(f, "{}-{}", int_to_ipv4(self.low), int_to_ipv4(self.high))
        }
    }
}

fn checked_ipv4(addr: &str) -> WhitelistResult<u32> {
    if !validate_ipv4(addr) {
        return Err(WhitelistError::NotIpv4(addr.to_string()));
    }
    Ok(ipv4_to_int(addr))
}

/// Parse one whitelist element, `"a.b.c.d"` or `"a.b.c.d-e.f.g.h"`, into a
/// [`Range`]. A lone address is shorthand for `addr-addr`.
///
/// Whitespace around the delimiter is ignored.
///
/// # Errors
/// * [`WhitelistError::NotIpv4`] - either side is not a dotted-quad (left checked first)
/// * [`WhitelistError::TooManyDelimiters`] - more than one `-`
/// * [`WhitelistError::RangeOrder`] - the right side is below the left side
pub fn parse_range_token(token: &str) -> WhitelistResult<Range> {
    let parts: Vec<&str> = token.split(RANGE_SEPARATOR).map(str::trim).collect();

    let retval = match parts.as_slice() {
        [addr] => Range::single(checked_ipv4(addr)?),
        [min, max] => {
            let low = checked_ipv4(min)?;
            let high = checked_ipv4(max)?;
            if high < low {
                return Err(WhitelistError::RangeOrder {
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
            Range { low, high }
        }
        _ => return Err(WhitelistError::TooManyDelimiters(token.to_string())),
    };

    log::trace!("parse_range_token(token={token:?}) ==> {retval:?}");
    Ok(retval)
}
