use chrono::{TimeZone, Utc};

pub use uuid::Uuid;
pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{Comment, CommentId, DELETED_CONTENT};

mod error;
pub use error::{Error, StorageError};

mod limits;
pub use limits::Limits;

mod sort;
pub use sort::SortKind;

mod topic;
pub use topic::TopicKey;

mod vote;
pub use vote::{UserVote, VoteMap};

/// Current time, truncated to the millisecond precision comments are stored with
pub fn now() -> Time {
    let now = Utc::now();
    time_from_millis(now.timestamp_millis()).unwrap_or(now)
}

pub fn time_from_millis(ms: i64) -> Option<Time> {
    Utc.timestamp_millis_opt(ms).single()
}
