//! Skip-keyword filter.

use crate::merge_requests::MergeRequest;

/// Case-insensitive keywords that exclude a merge request from linking.
///
/// An empty set never filters anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipKeywords {
    /// Keywords as configured, for reporting.
    keywords: Vec<String>,
    /// Lower-cased keywords, index-aligned with `keywords`.
    folded: Vec<String>,
}

impl SkipKeywords {
    /// Builds a keyword set. Entries are trimmed; blank entries are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        let folded = keywords.iter().map(|k| k.to_lowercase()).collect();
        Self { keywords, folded }
    }

    /// Parses a comma-separated list such as `"lockfile, pin"`.
    #[must_use]
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Returns true if no keywords are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Returns the configured keywords.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    /// Returns the first keyword found in the title or description.
    #[must_use]
    pub fn matching(&self, merge_request: &MergeRequest) -> Option<&str> {
        if self.is_empty() {
            return None;
        }

        let title = merge_request.title.to_lowercase();
        let description = merge_request.description.to_lowercase();

        self.folded
            .iter()
            .position(|k| title.contains(k.as_str()) || description.contains(k.as_str()))
            .map(|i| self.keywords[i].as_str())
    }
}
