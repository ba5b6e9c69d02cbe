//! `format` keyword validators.
//!
//! Only the formats named in the evaluator's scope are implemented; an
//! unrecognised format name is treated as always-valid, matching the
//! "format is an annotation unless a vocabulary asserts it" JSON Schema
//! convention.
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use email_address::EmailAddress;
use once_cell::sync::Lazy;

static COLOR_HEX_RE: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex"));

/// Dispatches to the validator for `format_name`, returning `true` (valid)
/// for anything not recognised.
#[must_use]
pub fn validate_format(format_name: &str, value: &str) -> bool {
    match format_name {
        "date" => is_valid_date(value),
        "time" => is_valid_time(value),
        "date-time" => is_valid_date_time(value),
        "email" => is_valid_email(value),
        "hostname" => is_valid_hostname(value),
        "ipv4" => Ipv4Addr::from_str(value).is_ok(),
        "ipv6" => Ipv6Addr::from_str(value).is_ok(),
        "uri" => url::Url::parse(value).is_ok(),
        "uri-reference" => !value.is_empty(),
        "color-hex" => COLOR_HEX_RE.is_match(value),
        _ => true,
    }
}

fn is_valid_date(date: &str) -> bool {
    if date.len() != 10 {
        return false;
    }
    let bytes = date.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' || bytes[..4].iter().chain(&bytes[5..7]).chain(&bytes[8..10]).any(|b| !b.is_ascii_digit()) {
        return false;
    }
    let year = parse_digits(&bytes[0..4]);
    let month = parse_digits(&bytes[5..7]) as u8;
    let day = parse_digits(&bytes[8..10]) as u8;
    if !(1..=12).contains(&month) {
        return false;
    }
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => (1..=31).contains(&day),
        4 | 6 | 9 | 11 => (1..=30).contains(&day),
        2 if is_leap_year(year as u16) => (1..=29).contains(&day),
        2 => (1..=28).contains(&day),
        _ => false,
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn parse_digits(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// `full-time` per RFC 3339: `HH:MM:SS[.fraction](Z|(+|-)HH:MM)`.
fn is_valid_time(time: &str) -> bool {
    let bytes = time.as_bytes();
    if bytes.len() < 9 {
        return false;
    }
    if bytes[2] != b':' || bytes[5] != b':' || !bytes[0..2].iter().chain(&bytes[3..5]).chain(&bytes[6..8]).all(u8::is_ascii_digit) {
        return false;
    }
    let hour = parse_digits(&bytes[0..2]);
    let minute = parse_digits(&bytes[3..5]);
    let second = parse_digits(&bytes[6..8]);
    if hour > 23 || minute > 59 || second > 60 {
        return false;
    }
    let mut rest = &time[8..];
    if let Some(stripped) = rest.strip_prefix('.') {
        let digits_end = stripped.find(|c: char| !c.is_ascii_digit()).unwrap_or(stripped.len());
        if digits_end == 0 {
            return false;
        }
        rest = &stripped[digits_end..];
    }
    if rest == "Z" || rest == "z" {
        return true;
    }
    let rest_bytes = rest.as_bytes();
    if rest_bytes.len() == 6 && (rest_bytes[0] == b'+' || rest_bytes[0] == b'-') && rest_bytes[3] == b':' {
        let offset_hour = std::str::from_utf8(&rest_bytes[1..3]).ok().and_then(|s| s.parse::<u32>().ok());
        let offset_minute = std::str::from_utf8(&rest_bytes[4..6]).ok().and_then(|s| s.parse::<u32>().ok());
        return matches!((offset_hour, offset_minute), (Some(h), Some(m)) if h <= 23 && m <= 59);
    }
    false
}

fn is_valid_date_time(value: &str) -> bool {
    let Some(sep_index) = value.find(['T', 't']) else {
        return false;
    };
    is_valid_date(&value[..sep_index]) && is_valid_time(&value[sep_index + 1..])
}

fn is_valid_email(email: &str) -> bool {
    let Ok(parsed) = EmailAddress::from_str(email) else {
        return false;
    };
    let domain = parsed.domain();
    if let Some(domain) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        if let Some(domain) = domain.strip_prefix("IPv6:") {
            domain.parse::<Ipv6Addr>().is_ok()
        } else {
            domain.parse::<Ipv4Addr>().is_ok()
        }
    } else {
        is_valid_hostname(&domain)
    }
}

fn is_valid_hostname(hostname: &str) -> bool {
    !(hostname.ends_with('-')
        || hostname.starts_with('-')
        || hostname.is_empty()
        || bytecount::num_chars(hostname.as_bytes()) > 255
        || hostname.chars().any(|c| !(c.is_alphanumeric() || c == '-' || c == '.'))
        || hostname.split('.').any(|part| bytecount::num_chars(part.as_bytes()) > 63))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("date", "2024-02-29", true)]
    #[test_case("date", "2023-02-29", false)]
    #[test_case("date", "2024-13-01", false)]
    #[test_case("time", "13:45:00Z", true)]
    #[test_case("time", "13:45:00.123+02:00", true)]
    #[test_case("time", "25:00:00Z", false)]
    #[test_case("date-time", "2024-02-29T13:45:00Z", true)]
    #[test_case("date-time", "2024-02-29 13:45:00Z", true)]
    #[test_case("date-time", "not-a-date-time", false)]
    #[test_case("email", "user@example.com", true)]
    #[test_case("email", "not-an-email", false)]
    #[test_case("hostname", "example.com", true)]
    #[test_case("hostname", "-bad.example.com", false)]
    #[test_case("ipv4", "127.0.0.1", true)]
    #[test_case("ipv4", "999.0.0.1", false)]
    #[test_case("ipv6", "::1", true)]
    #[test_case("uri", "https://example.com/x", true)]
    #[test_case("uri", "/relative/only", false)]
    #[test_case("uri-reference", "/relative/only", true)]
    #[test_case("uri-reference", "", false)]
    #[test_case("color-hex", "#fff", true)]
    #[test_case("color-hex", "#fffg", false)]
    #[test_case("unknown-format", "anything goes", true)]
    fn format_matches(format_name: &str, value: &str, expected: bool) {
        assert_eq!(validate_format(format_name, value), expected);
    }
}
