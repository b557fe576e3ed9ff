use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(pub(crate) String);

impl WorkspaceId {
    pub const EVERYTHING_RAW: &'static str = "0";

    pub fn everything() -> Self {
        Self(Self::EVERYTHING_RAW.to_owned())
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_everything(&self) -> bool {
        self.0 == Self::EVERYTHING_RAW
    }
}

impl Default for WorkspaceId {
    fn default() -> Self {
        Self::everything()
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub(crate) i32);

impl FolderId {
    pub const ALL: FolderId = FolderId(0);

    pub fn as_i32(self) -> i32 {
        self.0
    }

    pub fn from_i32(id: i32) -> Self {
        Self(id)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ChatId(pub(crate) String);

impl ChatId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) i64);

impl MessageId {
    pub fn as_i64(self) -> i64 {
        self.0
    }

    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct UserId(pub(crate) String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a pinned message. The textual form `{chat_id}_{message_id}` is
/// what gets persisted.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FocusKey {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl FocusKey {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (chat, message) = raw.trim().rsplit_once('_')?;
        if chat.is_empty() {
            return None;
        }
        let message_id = message.parse::<i64>().ok()?;
        Some(Self {
            chat_id: ChatId(chat.to_owned()),
            message_id: MessageId(message_id),
        })
    }
}

impl fmt::Display for FocusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.chat_id.0, self.message_id.0)
    }
}
