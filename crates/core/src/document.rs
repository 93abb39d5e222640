//! Structured notification documents.
//!
//! [`NotificationDocument`] is the renderer-agnostic shape the relay builds
//! from a domain event and hands to the outbound transport. Field values
//! above their length bound are truncated with an explicit marker rather
//! than cut silently.

use chrono::Utc;
use serde::Serialize;

use crate::types::{Timestamp, UserId};

/// Length bound for primary content fields (message bodies, reasons).
pub const MAX_FIELD_CONTENT: usize = 1000;

/// Length bound for before/after comparison fields.
pub const MAX_DIFF_CONTENT: usize = 500;

/// Marker appended to truncated content.
pub const TRUNCATION_MARKER: &str = "...";

/// Accent colors keyed by event severity/kind.
pub mod colors {
    pub const GREEN: u32 = 0x57F287;
    pub const ORANGE: u32 = 0xE67E22;
    pub const RED: u32 = 0xED4245;
    pub const BLURPLE: u32 = 0x5865F2;
    pub const LIGHT_GREY: u32 = 0x979C9F;
    pub const DARK_GREY: u32 = 0x607D8B;
    pub const BLUE: u32 = 0x3498DB;
}

/// The identity shown as the document's author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorIdentity {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// A single itemized field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A rendered notification document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationDocument {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub author: Option<AuthorIdentity>,
    pub fields: Vec<DocumentField>,
    /// Entity identifiers, joined with `" | "`.
    pub footer: String,
    pub timestamp: Timestamp,
}

impl NotificationDocument {
    /// Create a document with the given header; fields and footer start empty.
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            author: None,
            fields: Vec::new(),
            footer: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach an author identity.
    pub fn with_author(mut self, author: AuthorIdentity) -> Self {
        self.author = Some(author);
        self
    }

    /// Append a field, truncating the value at `bound` characters.
    pub fn push_field(&mut self, name: impl Into<String>, value: &str, bound: usize) {
        self.fields.push(DocumentField {
            name: name.into(),
            value: truncate(value, bound),
            inline: false,
        });
    }

    /// Append an entity identifier to the footer.
    pub fn push_footer(&mut self, part: &str) {
        if !self.footer.is_empty() {
            self.footer.push_str(" | ");
        }
        self.footer.push_str(part);
    }
}

/// Truncate `text` to at most `bound` characters.
///
/// Content at or under the bound is returned unmodified; longer content is
/// cut so that the result, including [`TRUNCATION_MARKER`], fits the bound.
/// Counts characters rather than bytes so multi-byte content never splits.
/// A bound smaller than the marker keeps nothing but the marker itself.
pub fn truncate(text: &str, bound: usize) -> String {
    if text.chars().count() <= bound {
        return text.to_string();
    }
    let keep = bound.saturating_sub(TRUNCATION_MARKER.len());
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_at_bound_is_unmodified() {
        let text = "a".repeat(MAX_FIELD_CONTENT);
        assert_eq!(truncate(&text, MAX_FIELD_CONTENT), text);
    }

    #[test]
    fn content_over_bound_is_truncated_with_marker() {
        let text = "a".repeat(MAX_FIELD_CONTENT + 1);
        let out = truncate(&text, MAX_FIELD_CONTENT);
        assert_eq!(out.chars().count(), MAX_FIELD_CONTENT);
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(600);
        let out = truncate(&text, MAX_DIFF_CONTENT);
        assert_eq!(out.chars().count(), MAX_DIFF_CONTENT);
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn bound_at_or_under_marker_length_keeps_only_the_marker() {
        let text = "abcdef";
        assert_eq!(truncate(text, TRUNCATION_MARKER.len()), TRUNCATION_MARKER);
        assert_eq!(truncate(text, 1), TRUNCATION_MARKER);
        assert_eq!(truncate(text, 0), TRUNCATION_MARKER);
    }

    #[test]
    fn push_field_applies_bound() {
        let mut doc = NotificationDocument::new("Test", "", colors::BLUE);
        doc.push_field("Content", &"x".repeat(2000), MAX_FIELD_CONTENT);
        assert_eq!(doc.fields[0].value.chars().count(), MAX_FIELD_CONTENT);
        assert!(doc.fields[0].value.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn footer_parts_are_pipe_joined() {
        let mut doc = NotificationDocument::new("Test", "", colors::BLUE);
        doc.push_footer("Message ID: 42");
        doc.push_footer("User ID: 7");
        assert_eq!(doc.footer, "Message ID: 42 | User ID: 7");
    }
}
