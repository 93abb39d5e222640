//! Stable event-key registry.
//!
//! Every relayable domain event category has a stable string key that
//! tenants can toggle on or off. Keep [`ALL`] sorted and updated when new
//! event categories are added.

pub const MEMBER_BAN: &str = "member_ban";
pub const MEMBER_JOIN: &str = "member_join";
pub const MEMBER_REMOVE: &str = "member_remove";
pub const MEMBER_UNBAN: &str = "member_unban";
pub const MESSAGE_DELETE: &str = "message_delete";
pub const MESSAGE_EDIT: &str = "message_edit";

/// All toggleable event keys, sorted.
pub const ALL: [&str; 6] = [
    MEMBER_BAN,
    MEMBER_JOIN,
    MEMBER_REMOVE,
    MEMBER_UNBAN,
    MESSAGE_DELETE,
    MESSAGE_EDIT,
];

/// Whether `key` names a known event category.
pub fn is_valid(key: &str) -> bool {
    ALL.contains(&key)
}
