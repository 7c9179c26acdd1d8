//! Ticket-key pattern.

use regex::Regex;
use thiserror::Error;

/// Errors that can occur when building a [`TicketKeyPattern`].
#[derive(Debug, Error)]
pub enum PatternError {
    /// The prefix is empty or only whitespace.
    #[error("ticket prefix is empty")]
    EmptyPrefix,

    /// The prefix contains whitespace.
    #[error("ticket prefix '{prefix}' contains whitespace")]
    Whitespace { prefix: String },

    /// The generated expression failed to compile.
    #[error("invalid ticket pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Matches ticket keys of the form `<prefix>-<digits>` anywhere in a text.
///
/// The prefix is matched literally and case-sensitively. The match is a plain
/// substring match, so `XPROJ-12` contains `PROJ-12`.
#[derive(Debug, Clone)]
pub struct TicketKeyPattern {
    prefix: String,
    regex: Regex,
}

impl TicketKeyPattern {
    /// Builds a pattern for the given project prefix (e.g. `PROJ`).
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the prefix is blank or contains whitespace.
    pub fn new(prefix: &str) -> Result<Self, PatternError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(PatternError::EmptyPrefix);
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(PatternError::Whitespace {
                prefix: prefix.to_string(),
            });
        }

        let regex = Regex::new(&format!("{}-[0-9]+", regex::escape(prefix)))?;
        Ok(Self {
            prefix: prefix.to_string(),
            regex,
        })
    }

    /// Returns the configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the first ticket key found in `text`.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }

    /// Returns true if `text` contains a ticket key.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reference check: `PROJ-` immediately followed by an ASCII digit.
    fn contains_key(text: &str) -> bool {
        text.match_indices("PROJ-").any(|(i, m)| {
            text[i + m.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
    }

    proptest! {
        /// Any text around `PROJ-<digits>` is detected.
        #[test]
        fn detects_key_in_any_text(
            before in ".{0,40}",
            digits in "[0-9]{1,12}",
            after in ".{0,40}"
        ) {
            let pattern = TicketKeyPattern::new("PROJ").unwrap();
            let text = format!("{before}PROJ-{digits}{after}");
            prop_assert!(pattern.is_match(&text));
        }

        /// Detection agrees with the reference check on near-miss texts.
        #[test]
        fn matches_only_texts_with_key(text in "[PROJprj0-9 _-]{0,40}") {
            let pattern = TicketKeyPattern::new("PROJ").unwrap();
            prop_assert_eq!(pattern.is_match(&text), contains_key(&text));
        }

        /// Arbitrary text without a key is never detected.
        #[test]
        fn ignores_arbitrary_text_without_key(text in ".{0,80}") {
            prop_assume!(!contains_key(&text));
            let pattern = TicketKeyPattern::new("PROJ").unwrap();
            prop_assert!(!pattern.is_match(&text));
        }
    }

    #[test]
    fn finds_key_anywhere_in_text() {
        let pattern = TicketKeyPattern::new("PROJ").unwrap();

        assert_eq!(pattern.find("Fixes PROJ-42 for good"), Some("PROJ-42"));
        assert_eq!(pattern.find("PROJ-1"), Some("PROJ-1"));
        assert_eq!(pattern.find("see (PROJ-1234567890)."), Some("PROJ-1234567890"));
        assert_eq!(pattern.find("first PROJ-1 then PROJ-2"), Some("PROJ-1"));
    }

    #[test]
    fn requires_dash_and_digits() {
        let pattern = TicketKeyPattern::new("PROJ").unwrap();

        assert!(!pattern.is_match("PROJ"));
        assert!(!pattern.is_match("PROJ-"));
        assert!(!pattern.is_match("PROJ-abc"));
        assert!(!pattern.is_match("PROJ 42"));
        assert!(!pattern.is_match("PROJ_42"));
        assert!(!pattern.is_match("Update foo to 1.2"));
    }

    #[test]
    fn is_case_sensitive() {
        let pattern = TicketKeyPattern::new("PROJ").unwrap();
        assert!(!pattern.is_match("proj-42"));
    }

    #[test]
    fn is_a_substring_match() {
        let pattern = TicketKeyPattern::new("PROJ").unwrap();
        assert_eq!(pattern.find("XPROJ-12"), Some("PROJ-12"));
        assert_eq!(pattern.find("https://jira/browse/PROJ-9"), Some("PROJ-9"));
    }

    #[test]
    fn escapes_prefix_metacharacters() {
        let pattern = TicketKeyPattern::new("A.B").unwrap();
        assert!(pattern.is_match("A.B-1"));
        assert!(!pattern.is_match("AXB-1"));
    }

    #[test]
    fn rejects_unicode_digits() {
        let pattern = TicketKeyPattern::new("PROJ").unwrap();
        assert!(!pattern.is_match("PROJ-\u{0663}"));
    }

    #[test]
    fn rejects_blank_prefix() {
        assert!(matches!(
            TicketKeyPattern::new(""),
            Err(PatternError::EmptyPrefix)
        ));
        assert!(matches!(
            TicketKeyPattern::new("   "),
            Err(PatternError::EmptyPrefix)
        ));
        assert!(matches!(
            TicketKeyPattern::new("MY PROJ"),
            Err(PatternError::Whitespace { .. })
        ));
    }

    #[test]
    fn trims_prefix() {
        let pattern = TicketKeyPattern::new(" PROJ ").unwrap();
        assert_eq!(pattern.prefix(), "PROJ");
    }
}
