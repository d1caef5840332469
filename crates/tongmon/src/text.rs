use std::sync::LazyLock;

use regex::Regex;

static RE_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").expect("invalid regex: fraction"));

static RE_PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("invalid regex: percentage"));

/// A `count/limit` pair as displayed by the client, e.g. member counts
/// ("120/150") or elixir usage ("3/5").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fraction {
    pub count: u64,
    pub limit: u64,
}

/// Parses an integer out of locale-formatted text by keeping ASCII digits
/// only. Thousands separators are stripped, surrounding text is ignored.
/// Returns 0 when no digits are present or the digits overflow.
pub fn parse_locale_int(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Matches the first `digits/digits` pattern anywhere in the text.
/// Returns `{0, 0}` when absent.
pub fn parse_fraction(text: &str) -> Fraction {
    RE_FRACTION
        .captures(text)
        .map(|caps| Fraction {
            count: caps[1].parse().unwrap_or(0),
            limit: caps[2].parse().unwrap_or(0),
        })
        .unwrap_or_default()
}

/// Extracts a `+N <unit_label>` bonus amount from mixed text, e.g.
/// `extract_bonus_amount("Đan Dược +1,500 Tu Vi", "Tu Vi")` → 1500.
/// The match is case-insensitive; returns 0 when absent.
pub fn extract_bonus_amount(text: &str, unit_label: &str) -> u64 {
    let pattern = format!(r"(?i)\+([0-9][0-9,.]*)\s*{}", regex::escape(unit_label));
    let Ok(re) = Regex::new(&pattern) else {
        return 0;
    };
    re.captures(text)
        .map(|caps| parse_locale_int(&caps[1]))
        .unwrap_or(0)
}

/// Parses a `N%` value out of the text. Returns 0.0 when absent.
pub fn parse_percentage(text: &str) -> f64 {
    RE_PERCENTAGE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0.0)
}

/// The longest contiguous run of ASCII digits, parsed as an integer.
/// Returns 0 when the text has no digits.
pub fn longest_digit_run(text: &str) -> u64 {
    text.split(|c: char| !c.is_ascii_digit())
        .max_by_key(|run| run.len())
        .and_then(|run| run.parse().ok())
        .unwrap_or(0)
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_int() {
        assert_eq!(parse_locale_int("120,000"), 120000);
        assert_eq!(parse_locale_int("1.500"), 1500);
        assert_eq!(parse_locale_int("  42 điểm  "), 42);
        assert_eq!(parse_locale_int(""), 0);
        assert_eq!(parse_locale_int("không có số"), 0);
    }

    #[test]
    fn test_parse_locale_int_overflow_defaults_to_zero() {
        assert_eq!(parse_locale_int("99999999999999999999999999"), 0);
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(
            parse_fraction("120/150"),
            Fraction {
                count: 120,
                limit: 150
            }
        );
        assert_eq!(
            parse_fraction("Thành viên: 120 / 150 người"),
            Fraction {
                count: 120,
                limit: 150
            }
        );
        assert_eq!(parse_fraction("no numbers here"), Fraction::default());
    }

    #[test]
    fn test_parse_fraction_overflow_preserved() {
        assert_eq!(parse_fraction("6/5"), Fraction { count: 6, limit: 5 });
    }

    #[test]
    fn test_extract_bonus_amount() {
        assert_eq!(extract_bonus_amount("Đan Dược +1,500 Tu Vi", "Tu Vi"), 1500);
        assert_eq!(extract_bonus_amount("Phi Kiếm +800Tu Vi", "Tu Vi"), 800);
        assert_eq!(extract_bonus_amount("+2,000 tu vi", "Tu Vi"), 2000);
        assert_eq!(extract_bonus_amount("Đan Dược 1,500 Tu Vi", "Tu Vi"), 0);
        assert_eq!(extract_bonus_amount("Đan Dược +1,500 Cống Hiến", "Tu Vi"), 0);
        assert_eq!(extract_bonus_amount("", "Tu Vi"), 0);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("45%"), 45.0);
        assert_eq!(parse_percentage("24.5 %"), 24.5);
        assert_eq!(parse_percentage("no percent"), 0.0);
        assert_eq!(parse_percentage("45"), 0.0);
    }

    #[test]
    fn test_longest_digit_run() {
        assert_eq!(longest_digit_run("Tổng cống hiến: 98765 điểm"), 98765);
        assert_eq!(longest_digit_run("abc12def3456gh7"), 3456);
        assert_eq!(longest_digit_run("no digits"), 0);
        assert_eq!(longest_digit_run(""), 0);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n b\t c  "), "a b c");
    }
}
