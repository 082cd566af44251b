/// Parses the leading integer of a year field.
///
/// Leading whitespace and an optional sign are accepted and parsing stops at
/// the first non-digit, so `"2019 "` and `"2019 (est.)"` both yield 2019.
/// Returns `None` when no digits are present or the value overflows.
pub fn parse_year_prefix(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i32 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::parse_year_prefix;

    #[test]
    fn parses_plain_and_padded_years() {
        assert_eq!(parse_year_prefix("2019"), Some(2019));
        assert_eq!(parse_year_prefix("2019 "), Some(2019));
        assert_eq!(parse_year_prefix("  2021"), Some(2021));
        assert_eq!(parse_year_prefix("2018-2019"), Some(2018));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(parse_year_prefix(""), None);
        assert_eq!(parse_year_prefix("unknown"), None);
        assert_eq!(parse_year_prefix("-"), None);
        assert_eq!(parse_year_prefix("99999999999"), None);
    }
}
