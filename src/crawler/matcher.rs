//! Keyword matching over raw page markup
//!
//! Matching runs against the raw serialized markup, not the extracted
//! visible text: a keyword inside a tag name, attribute value, or comment
//! still counts. "Content contains" is deliberately broader than "visible
//! text contains".

/// Case-insensitive substring test of `keyword` against `markup`.
pub fn contains_keyword(markup: &str, keyword: &str) -> bool {
    markup.to_lowercase().contains(&keyword.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_in_visible_text() {
        let markup = "<html><body><h1>Security info</h1></body></html>";
        assert!(contains_keyword(markup, "security"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let markup = r#"<!-- SECURITY --><div class="security">x</div>"#;
        assert!(contains_keyword(markup, "security"));
        assert!(contains_keyword(markup, "SECURITY"));
        assert!(contains_keyword(markup, "sEcUrItY"));
    }

    #[test]
    fn test_match_in_comment_only() {
        let markup = "<html><!-- hidden security note --><body>nothing here</body></html>";
        assert!(contains_keyword(markup, "security"));
    }

    #[test]
    fn test_match_in_attribute_value() {
        let markup = r#"<div data-topic="security-advisory">plain</div>"#;
        assert!(contains_keyword(markup, "security"));
    }

    #[test]
    fn test_no_match() {
        let markup = "<html><body>nothing relevant</body></html>";
        assert!(!contains_keyword(markup, "security"));
    }

    #[test]
    fn test_keyword_spanning_markup_does_not_match() {
        // The term must appear contiguously in the serialized markup
        let markup = "<b>secu</b>rity";
        assert!(!contains_keyword(markup, "security"));
    }
}
