//! Typed domain events delivered by the host platform client.

use hermod_core::event_keys;
use hermod_core::types::{ChannelId, MessageId, TenantId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A platform user as seen at event time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    /// Account username, unique within the platform.
    pub name: String,
    /// Per-tenant display name, when it differs from the username.
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserRef {
    /// `"Display (username) [ID: 42]"` as shown in notification text.
    pub fn display(&self) -> String {
        let display = self.display_name.as_deref().unwrap_or(&self.name);
        format!("{display} ({}) [ID: {}]", self.name, self.id)
    }
}

/// A moderation-relevant event on the host platform.
///
/// Every variant carries the tenant it belongs to and enough context to
/// render a notification without further platform lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainEvent {
    MemberJoined {
        tenant_id: TenantId,
        member: UserRef,
        account_created_at: Timestamp,
    },
    MemberLeft {
        tenant_id: TenantId,
        member: UserRef,
    },
    MemberBanned {
        tenant_id: TenantId,
        user: UserRef,
    },
    MemberUnbanned {
        tenant_id: TenantId,
        user: UserRef,
    },
    MessageDeleted {
        tenant_id: TenantId,
        author: UserRef,
        channel_id: ChannelId,
        channel_name: String,
        message_id: MessageId,
        content: String,
    },
    MessageEdited {
        tenant_id: TenantId,
        author: UserRef,
        channel_id: ChannelId,
        channel_name: String,
        message_id: MessageId,
        before: String,
        after: String,
    },
}

impl DomainEvent {
    /// The tenant this event belongs to.
    pub fn tenant_id(&self) -> TenantId {
        match self {
            DomainEvent::MemberJoined { tenant_id, .. }
            | DomainEvent::MemberLeft { tenant_id, .. }
            | DomainEvent::MemberBanned { tenant_id, .. }
            | DomainEvent::MemberUnbanned { tenant_id, .. }
            | DomainEvent::MessageDeleted { tenant_id, .. }
            | DomainEvent::MessageEdited { tenant_id, .. } => *tenant_id,
        }
    }

    /// The stable toggle key for this event category.
    pub fn event_key(&self) -> &'static str {
        match self {
            DomainEvent::MemberJoined { .. } => event_keys::MEMBER_JOIN,
            DomainEvent::MemberLeft { .. } => event_keys::MEMBER_REMOVE,
            DomainEvent::MemberBanned { .. } => event_keys::MEMBER_BAN,
            DomainEvent::MemberUnbanned { .. } => event_keys::MEMBER_UNBAN,
            DomainEvent::MessageDeleted { .. } => event_keys::MESSAGE_DELETE,
            DomainEvent::MessageEdited { .. } => event_keys::MESSAGE_EDIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> UserRef {
        UserRef {
            id,
            name: "rin".into(),
            display_name: Some("Rin".into()),
            avatar_url: None,
        }
    }

    #[test]
    fn event_keys_are_registered() {
        let event = DomainEvent::MessageDeleted {
            tenant_id: 1,
            author: user(2),
            channel_id: 3,
            channel_name: "general".into(),
            message_id: 4,
            content: "hello".into(),
        };
        assert!(event_keys::is_valid(event.event_key()));
        assert_eq!(event.tenant_id(), 1);
    }

    #[test]
    fn user_display_includes_username_and_id() {
        assert_eq!(user(7).display(), "Rin (rin) [ID: 7]");

        let bare = UserRef {
            id: 7,
            name: "rin".into(),
            display_name: None,
            avatar_url: None,
        };
        assert_eq!(bare.display(), "rin (rin) [ID: 7]");
    }
}
