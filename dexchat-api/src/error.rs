use serde_json::json;

use crate::CommentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage quota exceeded while writing {key:?}")]
    QuotaExceeded { key: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed serializing {key:?}: {message}")]
    Serialize { key: String, message: String },
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Comment content is empty")]
    EmptyContent,

    #[error("Comment content is {len} characters long, the maximum is {max}")]
    ContentTooLong { len: usize, max: usize },

    #[error("Comment content {0:?} is reserved")]
    ReservedContent(String),

    #[error("Unknown comment {0}")]
    UnknownComment(CommentId),

    #[error("Comment {0} was deleted")]
    CommentDeleted(CommentId),

    #[error("Comment {0} is not attached to a thread")]
    DetachedComment(CommentId),

    #[error("Replying to comment {0} would go deeper than {1} levels")]
    ReplyTooDeep(CommentId, usize),

    #[error("Unknown sort kind {0:?}")]
    UnknownSortKind(String),

    #[error("Unknown vote {0:?}")]
    UnknownVote(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// Validation errors are raised before anything is written
    pub fn is_validation(&self) -> bool {
        !matches!(self, Error::Storage(_))
    }

    pub fn contents(&self) -> serde_json::Value {
        match self {
            Error::EmptyContent => json!({
                "message": "comment cannot be empty",
                "type": "empty-content",
            }),
            Error::ContentTooLong { len, max } => json!({
                "message": "comment is too long",
                "type": "content-too-long",
                "len": len,
                "max": max,
            }),
            Error::ReservedContent(c) => json!({
                "message": "comment content is reserved",
                "type": "reserved-content",
                "content": c,
            }),
            Error::UnknownComment(id) => json!({
                "message": "unknown comment",
                "type": "unknown-comment",
                "id": id,
            }),
            Error::CommentDeleted(id) => json!({
                "message": "comment was deleted",
                "type": "comment-deleted",
                "id": id,
            }),
            Error::DetachedComment(id) => json!({
                "message": "comment is not attached to a thread",
                "type": "detached-comment",
                "id": id,
            }),
            Error::ReplyTooDeep(id, max) => json!({
                "message": "thread is too deep to reply",
                "type": "reply-too-deep",
                "id": id,
                "max": max,
            }),
            Error::UnknownSortKind(s) => json!({
                "message": "unknown sort kind",
                "type": "unknown-sort-kind",
                "value": s,
            }),
            Error::UnknownVote(s) => json!({
                "message": "unknown vote",
                "type": "unknown-vote",
                "value": s,
            }),
            Error::Storage(err) => json!({
                "message": err.to_string(),
                "type": "storage",
            }),
        }
    }
}
