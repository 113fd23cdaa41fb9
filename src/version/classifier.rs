//! Update classification between two release tags
//!
//! Tags come from arbitrary repositories, so this is a heuristic rather than
//! a SemVer comparison. Only the leading integer of each tag is considered:
//!
//! - "v2.3.1" -> 2
//! - "3.0" -> 3
//! - "release-2024" -> none (more than one leading letter)
//!
//! When both tags yield a leading integer the update is major only if that
//! integer strictly increased. When either tag has no leading integer the
//! update is always treated as major.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Optional single letter, then the digits we care about. Anything after is ignored.
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]?([0-9]+)").expect("valid leading integer pattern"));

/// Kind of update between a previous and a current tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Major,
    Minor,
}

impl UpdateKind {
    pub fn is_major(self) -> bool {
        matches!(self, UpdateKind::Major)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UpdateKind::Major => "major",
            UpdateKind::Minor => "minor",
        }
    }
}

/// Extract the leading integer of a tag, skipping at most one leading letter.
///
/// The digits are returned without leading zeros (`"0"` for all zeros) so
/// they can be compared with [`cmp_integers`] at any length. Returns `None`
/// for tags such as commit hashes or date-based names.
pub fn leading_integer(version: &str) -> Option<&str> {
    LEADING_INTEGER
        .captures(version)
        .and_then(|caps| caps.get(1))
        .map(|m| match m.as_str().trim_start_matches('0') {
            "" => "0",
            digits => digits,
        })
}

/// Numeric ordering of two zero-trimmed digit strings
fn cmp_integers(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Classify the transition from `previous` to `current`.
pub fn classify(previous: &str, current: &str) -> UpdateKind {
    match (leading_integer(previous), leading_integer(current)) {
        (Some(prev), Some(curr)) if cmp_integers(curr, prev).is_gt() => UpdateKind::Major,
        (Some(_), Some(_)) => UpdateKind::Minor,
        // strange versioning
        _ => UpdateKind::Major,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("v2.3.1", Some("2"))]
    #[case("3.0", Some("3"))]
    #[case("V10", Some("10"))]
    #[case("r42-beta", Some("42"))]
    #[case("1.9.0", Some("1"))]
    #[case("v007", Some("7"))]
    #[case("0.4.1", Some("0"))]
    #[case("abc123", None)]
    #[case("release-2024.01", None)]
    #[case("", None)]
    #[case("v", None)]
    #[case(".1.0", None)]
    #[case("v\u{0663}", None)] // non-ASCII digits
    #[case("99999999999999999999999", Some("99999999999999999999999"))] // wider than u64
    fn leading_integer_extracts_first_number(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(leading_integer(input), expected);
    }

    #[rstest]
    #[case("v1.2.0", "v2.0.0", UpdateKind::Major)]
    #[case("1.9.0", "1.10.0", UpdateKind::Minor)]
    #[case("abc123", "def456", UpdateKind::Major)] // neither side parses
    #[case("2.0", "2.0", UpdateKind::Minor)]
    #[case("3.0.0", "2.9.9", UpdateKind::Minor)] // downgrade
    #[case("v1.0.0", "2.0.0", UpdateKind::Major)] // prefix only on one side
    #[case("1.0.0", "nightly-2024-05-01", UpdateKind::Major)] // current does not parse
    #[case("deadbeef", "1.0.0", UpdateKind::Major)] // previous does not parse
    #[case("a1b2c3d", "1.0.0", UpdateKind::Minor)] // one letter then digits still parses
    #[case("v9", "v10", UpdateKind::Major)] // numeric, not lexical
    #[case("v010", "v9", UpdateKind::Minor)] // leading zeros ignored
    #[case("v30000000000000000000.0", "v20000000000000000000.0", UpdateKind::Minor)]
    #[case("v20000000000000000000.0", "v30000000000000000000.0", UpdateKind::Major)]
    #[case("18446744073709551615", "18446744073709551616", UpdateKind::Major)] // past u64::MAX
    fn classify_compares_leading_integers(
        #[case] previous: &str,
        #[case] current: &str,
        #[case] expected: UpdateKind,
    ) {
        assert_eq!(classify(previous, current), expected);
    }

    #[test]
    fn classify_is_major_iff_leading_integer_increases() {
        for prev in 0..6u64 {
            for curr in 0..6u64 {
                let kind = classify(&format!("v{prev}.1.0"), &format!("{curr}.0"));
                assert_eq!(kind.is_major(), curr > prev, "{prev} -> {curr}");
            }
        }
    }
}
