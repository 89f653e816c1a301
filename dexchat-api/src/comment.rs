use std::fmt;

use crate::{Time, Uuid};

/// Content that replaces the body of a deleted comment
pub const DELETED_CONTENT: &str = "{DELETED COMMENT}";

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn generate() -> CommentId {
        CommentId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> CommentId {
        CommentId(String::from(s))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: String,

    /// Creation date, never changed by edits
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Time,

    /// None for top-level comments
    pub parent_id: Option<CommentId>,

    pub upvotes: u32,
    pub downvotes: u32,
}

impl Comment {
    pub fn new(
        content: String,
        author: String,
        parent_id: Option<CommentId>,
        timestamp: Time,
    ) -> Comment {
        Comment {
            id: CommentId::generate(),
            content,
            author,
            timestamp,
            parent_id,
            upvotes: 0,
            downvotes: 0,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.content == DELETED_CONTENT
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Turn this comment into a tombstone, keeping its place in the thread
    pub fn tombstone(&mut self) {
        self.content = String::from(DELETED_CONTENT);
    }
}
