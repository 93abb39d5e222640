//! Rendering of domain events into notification documents.

use hermod_core::document::{
    colors, AuthorIdentity, NotificationDocument, MAX_DIFF_CONTENT, MAX_FIELD_CONTENT,
};

use crate::event::{DomainEvent, UserRef};

fn author(user: &UserRef) -> AuthorIdentity {
    AuthorIdentity {
        id: user.id,
        name: user.display_name.clone().unwrap_or_else(|| user.name.clone()),
        avatar_url: user.avatar_url.clone(),
    }
}

/// Build the notification document for a domain event.
///
/// Primary content fields are bounded at [`MAX_FIELD_CONTENT`] characters,
/// before/after comparison fields at [`MAX_DIFF_CONTENT`]; anything longer
/// is cut with an explicit marker. Footers carry the relevant entity ids.
pub fn render(event: &DomainEvent) -> NotificationDocument {
    match event {
        DomainEvent::MemberJoined {
            member,
            account_created_at,
            ..
        } => {
            let mut doc = NotificationDocument::new(
                "Member Joined",
                format!("{} joined the server.", member.display()),
                colors::GREEN,
            )
            .with_author(author(member));
            doc.push_field(
                "Account Created",
                &account_created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                MAX_FIELD_CONTENT,
            );
            doc.push_footer(&format!("User ID: {}", member.id));
            doc
        }

        DomainEvent::MemberLeft { member, .. } => {
            let mut doc = NotificationDocument::new(
                "Member Left",
                format!("{} left the server.", member.display()),
                colors::ORANGE,
            )
            .with_author(author(member));
            doc.push_footer(&format!("User ID: {}", member.id));
            doc
        }

        DomainEvent::MemberBanned { user, .. } => {
            let mut doc = NotificationDocument::new(
                "Member Banned",
                format!(
                    "{} was banned.\nAudit feed may contain moderator and reason.",
                    user.display()
                ),
                colors::RED,
            )
            .with_author(author(user));
            doc.push_footer(&format!("User ID: {}", user.id));
            doc
        }

        DomainEvent::MemberUnbanned { user, .. } => {
            let mut doc = NotificationDocument::new(
                "Member Unbanned",
                format!("{} was unbanned.", user.display()),
                colors::BLURPLE,
            )
            .with_author(author(user));
            doc.push_footer(&format!("User ID: {}", user.id));
            doc
        }

        DomainEvent::MessageDeleted {
            author: message_author,
            channel_name,
            message_id,
            content,
            ..
        } => {
            let mut doc = NotificationDocument::new(
                "Message Deleted",
                format!(
                    "Message by {} deleted in #{channel_name}",
                    message_author.display()
                ),
                colors::DARK_GREY,
            )
            .with_author(author(message_author));
            if !content.is_empty() {
                doc.push_field("Content", content, MAX_FIELD_CONTENT);
            }
            doc.push_footer(&format!("Message ID: {message_id}"));
            doc.push_footer(&format!("User ID: {}", message_author.id));
            doc
        }

        DomainEvent::MessageEdited {
            author: message_author,
            channel_name,
            message_id,
            before,
            after,
            ..
        } => {
            let mut doc = NotificationDocument::new(
                "Message Edited",
                format!(
                    "Message by {} edited in #{channel_name}",
                    message_author.display()
                ),
                colors::LIGHT_GREY,
            )
            .with_author(author(message_author));
            if !before.is_empty() {
                doc.push_field("Before", before, MAX_DIFF_CONTENT);
            }
            if !after.is_empty() {
                doc.push_field("After", after, MAX_DIFF_CONTENT);
            }
            doc.push_footer(&format!("Message ID: {message_id}"));
            doc.push_footer(&format!("User ID: {}", message_author.id));
            doc
        }
    }
}
