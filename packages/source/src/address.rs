//! Address cleaning and zip code extraction.
//!
//! Dataset addresses are free-form and frequently span several lines
//! (`"123 Main St\nSan Diego, CA 92101"`) or contain non-breaking spaces
//! copied from web pages. This module flattens them onto one line and pulls
//! out the zip code used for centroid lookup.

use regex::Regex;
use std::sync::LazyLock;

/// Regex for the first run of five consecutive digits.
static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{5}").expect("valid regex"));

/// Result of parsing a raw address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    /// Single-line, trimmed address.
    pub clean_address: Option<String>,
    /// First 5-digit run in the raw address. Not validated as a real
    /// postal code.
    pub zip_code: Option<String>,
}

/// Parses a raw address into a cleaned single-line address and a zip code.
///
/// Absent and empty input yield an empty [`ParsedAddress`].
#[must_use]
pub fn parse_address(raw: Option<&str>) -> ParsedAddress {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return ParsedAddress::default();
    };

    let zip_code = extract_zip(raw).map(str::to_string);
    let clean_address = raw.replace(['\n', '\u{00a0}'], " ").trim().to_string();

    ParsedAddress {
        clean_address: Some(clean_address),
        zip_code,
    }
}

/// Returns the leftmost run of five consecutive digits in `raw`.
#[must_use]
pub fn extract_zip(raw: &str) -> Option<&str> {
    ZIP_RE.find(raw).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_zip_from_one_line_address() {
        let parsed = parse_address(Some("123 Main St, San Diego, CA 92101"));
        assert_eq!(parsed.zip_code.as_deref(), Some("92101"));
        assert_eq!(
            parsed.clean_address.as_deref(),
            Some("123 Main St, San Diego, CA 92101")
        );
    }

    #[test]
    fn flattens_newlines_and_nbsp() {
        let parsed = parse_address(Some("  1501 Imperial Ave\nSan\u{00a0}Diego, CA 92113\n"));
        assert_eq!(
            parsed.clean_address.as_deref(),
            Some("1501 Imperial Ave San Diego, CA 92113")
        );
        assert_eq!(parsed.zip_code.as_deref(), Some("92113"));
    }

    #[test]
    fn takes_first_five_digit_run() {
        // A five-digit street number comes before the zip.
        assert_eq!(
            extract_zip("10606 Camino Ruiz, San Diego, CA 92126"),
            Some("10606")
        );
        // ZIP+4 keeps the leading five digits.
        assert_eq!(extract_zip("San Diego, CA 921011234"), Some("92101"));
    }

    #[test]
    fn no_zip_when_no_five_digit_run() {
        let parsed = parse_address(Some("PO Box 1234, San Diego"));
        assert_eq!(parsed.zip_code, None);
        assert_eq!(
            parsed.clean_address.as_deref(),
            Some("PO Box 1234, San Diego")
        );
    }

    #[test]
    fn absent_and_empty_yield_nothing() {
        assert_eq!(parse_address(None), ParsedAddress::default());
        assert_eq!(parse_address(Some("")), ParsedAddress::default());
    }

    #[test]
    fn whitespace_only_is_cleaned_to_empty() {
        let parsed = parse_address(Some(" \n "));
        assert_eq!(parsed.clean_address.as_deref(), Some(""));
        assert_eq!(parsed.zip_code, None);
    }
}
