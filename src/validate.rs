//! Review-URL recognition.

use regex::Regex;
use std::sync::LazyLock;

const REVIEW_URL_PATTERN: &str = r"^https://(www\.)?backloggd\.com/u/[^/]+/review/[0-9]+/?$";

static REVIEW_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(REVIEW_URL_PATTERN).expect("review URL pattern is valid")
});

/// Returns true when `input` is a well-formed Backloggd review URL:
/// `https://[www.]backloggd.com/u/<user>/review/<digits>[/]`.
///
/// The match is exact and case-sensitive; no normalization is applied.
pub fn is_review_url(input: &str) -> bool {
    REVIEW_URL_RE.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_review_urls() {
        assert!(is_review_url("https://backloggd.com/u/bob/review/42"));
        assert!(is_review_url("https://www.backloggd.com/u/bob/review/42"));
        assert!(is_review_url("https://backloggd.com/u/bob/review/42/"));
        assert!(is_review_url("https://backloggd.com/u/some_user-123/review/9"));
    }

    #[test]
    fn rejects_other_schemes_and_hosts() {
        assert!(!is_review_url("http://backloggd.com/u/bob/review/42"));
        assert!(!is_review_url("HTTPS://backloggd.com/u/bob/review/42"));
        assert!(!is_review_url("https://example.com/u/bob/review/42"));
        assert!(!is_review_url("https://api.backloggd.com/u/bob/review/42"));
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(!is_review_url(""));
        assert!(!is_review_url("https://backloggd.com/u/bob/review/abc"));
        assert!(!is_review_url("https://backloggd.com/u/bob/review/"));
        assert!(!is_review_url("https://backloggd.com/u//review/42"));
        assert!(!is_review_url("https://backloggd.com/u/a/b/review/42"));
        assert!(!is_review_url("https://backloggd.com/u/bob/review/42/extra"));
        assert!(!is_review_url("https://backloggd.com/games/42"));
    }
}
