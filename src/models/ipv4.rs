//! IPv4 dotted-quad validation and numeric conversion.
//!
//! [`validate_ipv4`] is the only gate in front of [`ipv4_to_int`]; every
//! caller checks a string with the former before converting it.

use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;

/// Largest value an octet may hold.
pub const MAX_OCTET: u32 = 255;

lazy_static! {
    // `[0-9]` rather than `\d`: the latter matches non-ASCII digits.
    // An octet is `0` or has no leading zero.
    static ref DOTTED_QUAD: Regex =
        Regex::new(r"^(0|[1-9][0-9]{0,2})\.(0|[1-9][0-9]{0,2})\.(0|[1-9][0-9]{0,2})\.(0|[1-9][0-9]{0,2})$")
            .expect("Invalid Regex?");
}

/// Return true if `addr` is exactly four decimal octets in `[0,255]`
/// separated by single dots, with nothing before or after. Octets are
/// canonical: `0` alone, otherwise no leading zero (`01.2.3.4` is invalid).
///
/// Never fails; malformed input just yields `false`.
///
/// # Examples
/// ```
/// use ip_whitelist::models::validate_ipv4;
/// assert!(validate_ipv4("192.168.1.1"));
/// assert!(!validate_ipv4("192.168.1.256"));
/// assert!(!validate_ipv4(" 192.168.1.1"));
/// ```
pub fn validate_ipv4(addr: &str) -> bool {
    let retval = match DOTTED_QUAD.captures(addr) {
        Some(caps) => caps
            .iter()
            .skip(1)
            .flatten()
            .all(|octet| octet.as_str().parse::<u32>().is_ok_and(|v| v <= MAX_OCTET)),
        None => false,
    };
    log::trace!("validate_ipv4(addr={addr:?}) ==> {retval}");
    retval
}

/// Fold a validated dotted-quad into its 32-bit value, most significant
/// octet first (`192.168.1.1` => `3232235777`).
///
/// `addr` must already have passed [`validate_ipv4`]; other input gives an
/// unspecified value.
pub fn ipv4_to_int(addr: &str) -> u32 {
    debug_assert!(validate_ipv4(addr), "ipv4_to_int({addr:?}) not validated");
    let retval = addr
        .split('.')
        .map(|octet| octet.parse::<u32>().unwrap_or_default())
        .fold(0u32, |acc, octet| (acc << 8) | octet);
    log::trace!("ipv4_to_int(addr={addr:?}) ==> {retval}");
    retval
}

/// Render a numeric address back to dotted-quad form.
pub fn int_to_ipv4(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ipv4_ok() {
        for addr in [
            "0.0.0.0",
            "1.2.3.4",
            "10.0.0.255",
            "192.168.1.1",
            "255.255.255.255",
            "100.200.250.0",
        ] {
            assert!(validate_ipv4(addr), "{addr} should be valid");
        }
    }

    #[test]
    fn test_validate_ipv4_rejects() {
        for addr in [
            "",
            "a.a.a.a",
            "1.2.3",
            "1.2.3.4.5",
            "1..2.3",
            "1.2.3.",
            ".1.2.3",
            "256.0.0.0",
            "1.2.3.999",
            "1.2.3.1000",
            "+1.2.3.4",
            "1.2.3.-4",
            " 1.2.3.4",
            "1.2.3.4 ",
            "1.2.3.4\n",
            "1.2. 3.4",
            "http://1.2.3.4",
            "1.2.3.4/32",
            "1.2.3.4-1.2.3.5",
            "١.٢.٣.٤",
        ] {
            assert!(!validate_ipv4(addr), "{addr:?} should be invalid");
        }
    }

    #[test]
    fn test_validate_ipv4_leading_zeros() {
        for addr in [
            "01.2.3.4",
            "001.2.3.4",
            "0001.2.3.4",
            "1.2.3.00",
            "1.2.3.010",
            "00.0.0.0",
        ] {
            assert!(!validate_ipv4(addr), "{addr:?} has a non-canonical octet");
        }
        assert!(validate_ipv4("10.0.100.0"), "zero digits inside octets are fine");
    }

    #[test]
    fn test_ipv4_to_int() {
        assert_eq!(ipv4_to_int("192.168.1.1"), 3232235777);
        assert_eq!(ipv4_to_int("0.0.0.0"), 0);
        assert_eq!(ipv4_to_int("255.255.255.255"), 4294967295);
        assert_eq!(ipv4_to_int("1.1.1.1"), 16843009);
        assert_eq!(ipv4_to_int("123.0.0.100"), 2063597668);
    }

    #[test]
    fn test_ipv4_to_int_matches_std() {
        for addr in ["8.8.8.8", "10.20.30.40", "172.16.254.1", "224.0.0.251"] {
            let std_addr: Ipv4Addr = addr.parse().expect("std parse");
            assert_eq!(ipv4_to_int(addr), u32::from(std_addr), "{addr}");
        }
    }

    #[test]
    fn test_int_to_ipv4() {
        assert_eq!(int_to_ipv4(3232235777), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(int_to_ipv4(0).to_string(), "0.0.0.0");
    }
}
