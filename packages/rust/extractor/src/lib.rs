//! Walk score extraction from raw page bodies.
//!
//! Pages embed their score in a badge image reference:
//! `pp.walk.sc/badge/walk/score/<digits>.png`. The first such reference wins;
//! its digits become the score.

use std::sync::LazyLock;

use regex::bytes::Regex;

use walkscore_shared::Score;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches the badge image path. ASCII digits only, case-sensitive.
static BADGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pp\.walk\.sc/badge/walk/score/[0-9]+\.png").expect("badge regex")
});

/// Return the first badge reference in `body`, if any.
pub fn find_badge(body: &[u8]) -> Option<&[u8]> {
    BADGE_RE.find(body).map(|m| m.as_bytes())
}

/// Extract the walk score from a page body.
///
/// Works on bytes so pages that are not valid UTF-8 are still scanned.
pub fn extract_score(body: &[u8]) -> Score {
    let Some(badge) = find_badge(body) else {
        return Score::NotFound;
    };

    let digits: String = badge
        .iter()
        .filter(|b| b.is_ascii_digit())
        .map(|&b| char::from(b))
        .collect();

    if digits.is_empty() {
        Score::NotFound
    } else {
        Score::Value(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(badge: &str) -> Vec<u8> {
        format!(
            r#"<html><body><a href="/how-it-works"><img src="//{badge}" alt="Walk Score"></a></body></html>"#
        )
        .into_bytes()
    }

    #[test]
    fn extracts_score() {
        let body = page("pp.walk.sc/badge/walk/score/87.png");
        assert_eq!(extract_score(&body), Score::Value("87".into()));
    }

    #[test]
    fn zero_is_a_score() {
        let body = page("pp.walk.sc/badge/walk/score/0.png");
        assert_eq!(extract_score(&body), Score::Value("0".into()));
    }

    #[test]
    fn missing_badge_is_not_found() {
        let body = b"<html><body>No score here</body></html>";
        assert_eq!(extract_score(body), Score::NotFound);
        assert_eq!(extract_score(body).to_string(), "string not found");
    }

    #[test]
    fn first_badge_wins() {
        let body = b"pp.walk.sc/badge/walk/score/12.png pp.walk.sc/badge/walk/score/99.png";
        assert_eq!(extract_score(body), Score::Value("12".into()));
    }

    #[test]
    fn case_sensitive() {
        let body = b"PP.WALK.SC/badge/walk/score/55.png";
        assert_eq!(extract_score(body), Score::NotFound);
    }

    #[test]
    fn requires_digits_and_png_suffix() {
        assert_eq!(
            extract_score(b"pp.walk.sc/badge/walk/score/.png"),
            Score::NotFound
        );
        assert_eq!(
            extract_score(b"pp.walk.sc/badge/walk/score/55.svg"),
            Score::NotFound
        );
        assert_eq!(
            extract_score(b"pp.walk.sc/badge/walk/score/5x5.png"),
            Score::NotFound
        );
    }

    #[test]
    fn dots_are_literal() {
        assert_eq!(
            extract_score(b"ppXwalk.sc/badge/walk/score/40.png"),
            Score::NotFound
        );
        assert_eq!(
            extract_score(b"pp.walk.sc/badge/walk/score/40Xpng"),
            Score::NotFound
        );
    }

    #[test]
    fn non_utf8_body() {
        let mut body = vec![0xff, 0xfe, 0x00];
        body.extend_from_slice(b"pp.walk.sc/badge/walk/score/64.png");
        body.push(0xc3);
        assert_eq!(extract_score(&body), Score::Value("64".into()));
    }

    #[test]
    fn find_badge_returns_match() {
        let body = page("pp.walk.sc/badge/walk/score/100.png");
        assert_eq!(
            find_badge(&body),
            Some(&b"pp.walk.sc/badge/walk/score/100.png"[..])
        );
    }
}
