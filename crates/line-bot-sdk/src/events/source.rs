//! Source resolution for webhook events.
//!
//! The provider describes where an event came from with a `source` object
//! whose `type` is `user`, `group` or `room`. Anything else, including a
//! missing source, resolves to [`Source::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::raw::RawSource;

/// Conversation an event originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Source {
    /// One-to-one chat with a user
    User { user_id: String },

    /// Group chat; `user_id` is the acting member
    Group { user_id: String, group_id: String },

    /// Multi-person room; `user_id` is the acting member
    Room { user_id: String, room_id: String },

    /// Source type not recognised
    Unknown,
}

/// Discriminant of [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    User,
    Group,
    Room,
    Unknown,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Room => "room",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl Source {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::User { .. } => SourceKind::User,
            Self::Group { .. } => SourceKind::Group,
            Self::Room { .. } => SourceKind::Room,
            Self::Unknown => SourceKind::Unknown,
        }
    }

    /// Acting user id. `None` only for [`Source::Unknown`].
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User { user_id } | Self::Group { user_id, .. } | Self::Room { user_id, .. } => {
                Some(user_id)
            }
            Self::Unknown => None,
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::Group { group_id, .. } => Some(group_id),
            _ => None,
        }
    }

    pub fn room_id(&self) -> Option<&str> {
        match self {
            Self::Room { room_id, .. } => Some(room_id),
            _ => None,
        }
    }

    /// Id to address a push message to this conversation: the group or room
    /// id when present, otherwise the user id.
    pub fn push_target(&self) -> Option<&str> {
        match self {
            Self::User { user_id } => Some(user_id),
            Self::Group { group_id, .. } => Some(group_id),
            Self::Room { room_id, .. } => Some(room_id),
            Self::Unknown => None,
        }
    }
}

/// Resolve a provider source descriptor into a [`Source`].
///
/// Pure and total: identifiers the provider omitted become empty strings.
pub fn resolve_source(raw: Option<&RawSource>) -> Source {
    let Some(raw) = raw else {
        return Source::Unknown;
    };

    let user_id = raw.user_id.clone().unwrap_or_default();
    match raw.kind.as_str() {
        "user" => Source::User { user_id },
        "group" => Source::Group {
            user_id,
            group_id: raw.group_id.clone().unwrap_or_default(),
        },
        "room" => Source::Room {
            user_id,
            room_id: raw.room_id.clone().unwrap_or_default(),
        },
        _ => Source::Unknown,
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
