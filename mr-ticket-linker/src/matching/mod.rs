//! Link detection and the per-merge-request linking decision.
//!
//! A merge request is linked to a new tracking issue only when it passes the
//! skip-keyword filter and none of its texts already references a ticket:
//!
//! 1. title or description contains a skip-keyword (case-insensitive): skip
//! 2. title, description or a note contains `<prefix>-<digits>`: skip
//! 3. otherwise: create an issue and comment the link back

mod keywords;
mod pattern;

pub use keywords::SkipKeywords;
pub use pattern::{PatternError, TicketKeyPattern};

use crate::merge_requests::{DiscussionNote, MergeRequest};
use std::fmt;

/// Where an existing ticket reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLocation {
    /// Merge request title.
    Title,
    /// Merge request description.
    Description,
    /// A discussion note.
    Note {
        /// Note id.
        id: u64,
    },
}

impl fmt::Display for LinkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Description => f.write_str("description"),
            Self::Note { id } => write!(f, "note {id}"),
        }
    }
}

/// An existing ticket reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// The first ticket key found.
    pub key: String,
    /// Where it was found.
    pub location: LinkLocation,
}

/// Searches a merge request for an existing ticket reference.
///
/// Checks the title, then the description, then `notes` in the order given
/// (callers pass them oldest first) and stops at the first match.
#[must_use]
pub fn detect_link(
    merge_request: &MergeRequest,
    notes: &[DiscussionNote],
    pattern: &TicketKeyPattern,
) -> Option<LinkMatch> {
    let found = |key: &str, location| LinkMatch {
        key: key.to_string(),
        location,
    };

    if let Some(key) = pattern.find(&merge_request.title) {
        return Some(found(key, LinkLocation::Title));
    }
    if let Some(key) = pattern.find(&merge_request.description) {
        return Some(found(key, LinkLocation::Description));
    }
    notes.iter().find_map(|note| {
        pattern
            .find(&note.body)
            .map(|key| found(key, LinkLocation::Note { id: note.id }))
    })
}

/// Why a merge request is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Title or description contains a skip-keyword.
    KeywordFiltered {
        /// The keyword that matched, as configured.
        keyword: String,
    },
    /// A ticket is already referenced.
    AlreadyLinked(LinkMatch),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeywordFiltered { keyword } => write!(f, "matches skip-keyword '{keyword}'"),
            Self::AlreadyLinked(link) => {
                write!(f, "already linked to {} ({})", link.key, link.location)
            }
        }
    }
}

/// Outcome of the linking policy for one merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave the merge request alone.
    Skip(SkipReason),
    /// Create a tracking issue and comment the link back.
    Link,
}

/// Skip-keywords and ticket pattern applied to every merge request of a run.
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    keywords: SkipKeywords,
    pattern: TicketKeyPattern,
}

impl LinkPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(keywords: SkipKeywords, pattern: TicketKeyPattern) -> Self {
        Self { keywords, pattern }
    }

    /// Returns the ticket-key pattern.
    #[must_use]
    pub fn pattern(&self) -> &TicketKeyPattern {
        &self.pattern
    }

    /// Keyword stage only; lets callers skip fetching notes for filtered
    /// merge requests.
    #[must_use]
    pub fn pre_screen(&self, merge_request: &MergeRequest) -> Option<SkipReason> {
        self.keywords
            .matching(merge_request)
            .map(|keyword| SkipReason::KeywordFiltered {
                keyword: keyword.to_string(),
            })
    }

    /// Full decision over the merge request and its notes.
    #[must_use]
    pub fn decide(&self, merge_request: &MergeRequest, notes: &[DiscussionNote]) -> Decision {
        if let Some(reason) = self.pre_screen(merge_request) {
            return Decision::Skip(reason);
        }
        match detect_link(merge_request, notes, &self.pattern) {
            Some(link) => Decision::Skip(SkipReason::AlreadyLinked(link)),
            None => Decision::Link,
        }
    }
}
