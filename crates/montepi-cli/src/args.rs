//! Sample-count argument handling.

/// Resolve the optional point-count argument.
///
/// The argument is read like C `atol`: leading whitespace, an optional `+`,
/// then as many decimal digits as follow. Anything that yields no positive
/// `u64` (missing, non-numeric, negative, zero, overflowing) selects `default`.
pub fn parse_points(arg: Option<&str>, default: u64) -> u64 {
    arg.and_then(leading_count)
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

fn leading_count(arg: &str) -> Option<u64> {
    let trimmed = arg.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: u64 = 120_000_000;

    #[test]
    fn test_missing_argument() {
        assert_eq!(parse_points(None, DEFAULT), DEFAULT);
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(parse_points(Some("1000"), DEFAULT), 1000);
        assert_eq!(parse_points(Some("+42"), DEFAULT), 42);
        assert_eq!(parse_points(Some("  77"), DEFAULT), 77);
    }

    #[test]
    fn test_zero_falls_back() {
        assert_eq!(parse_points(Some("0"), DEFAULT), DEFAULT);
        assert_eq!(parse_points(Some("000"), DEFAULT), DEFAULT);
    }

    #[test]
    fn test_unparsable_falls_back() {
        assert_eq!(parse_points(Some("abc"), DEFAULT), DEFAULT);
        assert_eq!(parse_points(Some(""), DEFAULT), DEFAULT);
        assert_eq!(parse_points(Some("-5"), DEFAULT), DEFAULT);
        assert_eq!(parse_points(Some("99999999999999999999999"), DEFAULT), DEFAULT);
    }

    #[test]
    fn test_trailing_garbage_is_ignored() {
        assert_eq!(parse_points(Some("12abc"), DEFAULT), 12);
        assert_eq!(parse_points(Some("1e6"), DEFAULT), 1);
    }
}
