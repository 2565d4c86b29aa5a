//! Text normalization primitives shared by alias matching, option scoring,
//! and the value setters.
//!
//! Two normal forms are used throughout the engine:
//!
//! - **norm**: lowercase + trim. Used for option text comparison.
//! - **squash**: norm with all whitespace, hyphens, and underscores removed.
//!   Used for alias matching so `first_name`, `First Name`, and `firstname`
//!   all compare equal.
//!
//! Matching-side normalization (`normalize_for_matching`) additionally strips
//! punctuation and collapses runs of whitespace, which tolerates option
//! labels decorated with icons, counts, or helper text.

use chrono::NaiveDate;

/// Lowercase + trim.
pub fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Lowercase, trimmed, with all whitespace/hyphen/underscore removed.
pub fn squash(s: &str) -> String {
    norm(s)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect()
}

/// Lowercase, punctuation stripped, whitespace collapsed to single spaces.
///
/// This is the normal form used when comparing a target value against
/// `<option>` text/values and radio labels.
pub fn normalize_for_matching(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else if c.is_whitespace() {
            pending_space = true;
        }
        // Other punctuation is dropped without acting as a separator,
        // matching `[^\w\s]` removal before whitespace collapsing.
    }
    out
}

/// Whether a value looks like an absolute URL (`http(s)://…` or `www.…`).
pub fn looks_like_url(s: &str) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return false;
    }
    if let Ok(u) = url::Url::parse(t) {
        return matches!(u.scheme(), "http" | "https");
    }
    t.to_lowercase().starts_with("www.")
}

/// Normalize a date value to an ISO calendar-date string (`YYYY-MM-DD`).
///
/// Accepts RFC 3339 timestamps, bare ISO dates, and a few common
/// human formats. Unparseable input returns `None`, which callers treat
/// as "skip this fill" rather than an error.
pub fn to_date_input(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%b %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }
    // Timestamps with a date prefix ("2023-01-15T00:00:00" without offset).
    if t.len() >= 10 {
        if let Ok(d) = NaiveDate::parse_from_str(&t[..10], "%Y-%m-%d") {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }
    None
}

/// Normalize a compensation string to a plain rupee/dollar amount.
///
/// Strips currency symbols, commas, and spaces; scales `lpa`/`lac`/`lakh`
/// by 100 000 and a bare `k` suffix by 1000. Returns `None` when no
/// leading number can be parsed.
pub fn normalize_ctc(s: &str) -> Option<i64> {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ',' | '₹' | '$') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let digits_end = cleaned
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(cleaned.len());
    let num: f64 = cleaned[..digits_end].parse().ok()?;
    let suffix = &cleaned[digits_end..];
    let scaled = if suffix.contains("lpa") || suffix.contains("lac") || suffix.contains("lakh") {
        num * 100_000.0
    } else if suffix == "k" {
        num * 1000.0
    } else {
        num
    };
    Some(scaled.round() as i64)
}

/// Parse boolean-like strings: `true/false`, `yes/no`, `y/n`.
pub fn parse_boolish(s: &str) -> Option<bool> {
    match norm(s).as_str() {
        "true" | "yes" | "y" => Some(true),
        "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Affirmative/negative marker check against a radio's combined text.
///
/// `want=true` matches text containing "yes"/"true" or exactly "y"/"t";
/// `want=false` matches "no"/"false" or exactly "n"/"f".
pub fn boolean_marker_match(combined_text: &str, want: bool) -> bool {
    let t = norm(combined_text);
    if want {
        t.contains("yes") || t.contains("true") || t == "y" || t == "t"
    } else {
        t.contains("no") || t.contains("false") || t == "n" || t == "f"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squash_separator_insensitive() {
        assert_eq!(squash("First Name"), "firstname");
        assert_eq!(squash("first_name"), "firstname");
        assert_eq!(squash("first-name"), "firstname");
        assert_eq!(squash("  firstname  "), "firstname");
    }

    #[test]
    fn test_normalize_for_matching() {
        assert_eq!(normalize_for_matching("  Full-Time!  "), "fulltime");
        assert_eq!(normalize_for_matching("United   States"), "united states");
        assert_eq!(normalize_for_matching("U.S. Citizen"), "us citizen");
    }

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("https://example.com/profile"));
        assert!(looks_like_url("http://example.com"));
        assert!(looks_like_url("www.example.com"));
        assert!(!looks_like_url("example"));
        assert!(!looks_like_url("ftp://example.com"));
        assert!(!looks_like_url(""));
    }

    #[test]
    fn test_to_date_input_rfc3339() {
        assert_eq!(
            to_date_input("2023-01-15T00:00:00Z").as_deref(),
            Some("2023-01-15")
        );
    }

    #[test]
    fn test_to_date_input_variants() {
        assert_eq!(to_date_input("2023-01-15").as_deref(), Some("2023-01-15"));
        assert_eq!(to_date_input("01/15/2023").as_deref(), Some("2023-01-15"));
        assert_eq!(to_date_input("not a date"), None);
        assert_eq!(to_date_input(""), None);
    }

    #[test]
    fn test_normalize_ctc() {
        assert_eq!(normalize_ctc("12 lpa"), Some(1_200_000));
        assert_eq!(normalize_ctc("80k"), Some(80_000));
        assert_eq!(normalize_ctc("₹1,50,000"), Some(150_000));
        assert_eq!(normalize_ctc("95000"), Some(95_000));
        assert_eq!(normalize_ctc("negotiable"), None);
        assert_eq!(normalize_ctc(""), None);
    }

    #[test]
    fn test_parse_boolish() {
        assert_eq!(parse_boolish("Yes"), Some(true));
        assert_eq!(parse_boolish("n"), Some(false));
        assert_eq!(parse_boolish("maybe"), None);
    }

    #[test]
    fn test_boolean_marker_match() {
        assert!(boolean_marker_match("Yes, I am authorized", true));
        assert!(boolean_marker_match("No", false));
        assert!(!boolean_marker_match("Decline to answer", true));
        assert!(!boolean_marker_match("Decline to answer", false));
    }
}
