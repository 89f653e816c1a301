use serde::{de::DeserializeOwned, Serialize};

use crate::api::{Comment, SortKind, StorageError, TopicKey, VoteMap};

/// Key of the author name remembered across topics
pub const AUTHOR_KEY: &str = "comment-author";

/// Synchronous string key-value storage, like the browser's local storage
pub trait Backend {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str);
}

/// Typed access to the comments, votes and preferences of every topic
///
/// Reads never fail: missing or malformed data reads as empty.
#[derive(Clone, Debug)]
pub struct CommentStore<B> {
    backend: B,
}

impl<B: Backend> CommentStore<B> {
    pub fn new(backend: B) -> CommentStore<B> {
        CommentStore { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.backend.get_raw(key) {
            None => return T::default(),
            Some(raw) => raw,
        };
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(key, %err, "ignoring malformed stored data");
                T::default()
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
            key: String::from(key),
            message: e.to_string(),
        })?;
        self.backend.set_raw(key, &raw)
    }

    pub fn comments(&self, topic: &TopicKey) -> Vec<Comment> {
        self.read_json(&topic.comments_key())
    }

    pub fn save_comments(
        &mut self,
        topic: &TopicKey,
        comments: &[Comment],
    ) -> Result<(), StorageError> {
        self.write_json(&topic.comments_key(), &comments)
    }

    pub fn user_votes(&self, topic: &TopicKey) -> VoteMap {
        self.read_json(&topic.votes_key())
    }

    pub fn save_user_votes(&mut self, topic: &TopicKey, votes: &VoteMap) -> Result<(), StorageError> {
        self.write_json(&topic.votes_key(), votes)
    }

    pub fn sort_preference(&self, topic: &TopicKey) -> SortKind {
        let key = topic.sort_key();
        match self.backend.get_raw(&key).map(|s| s.parse::<SortKind>()) {
            None => SortKind::default(),
            Some(Ok(kind)) => kind,
            Some(Err(err)) => {
                tracing::debug!(%key, %err, "ignoring stored sort preference");
                SortKind::default()
            }
        }
    }

    pub fn save_sort_preference(
        &mut self,
        topic: &TopicKey,
        kind: SortKind,
    ) -> Result<(), StorageError> {
        self.backend.set_raw(&topic.sort_key(), kind.as_str())
    }

    pub fn last_author(&self) -> Option<String> {
        self.backend
            .get_raw(AUTHOR_KEY)
            .filter(|a| !a.trim().is_empty())
    }

    pub fn save_last_author(&mut self, author: &str) -> Result<(), StorageError> {
        self.backend.set_raw(AUTHOR_KEY, author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{time_from_millis, CommentId, UserVote},
        MemoryBackend,
    };

    fn pikachu() -> TopicKey {
        TopicKey::new("Pikachu")
    }

    fn comment(id: &str) -> Comment {
        Comment {
            id: CommentId::from(id),
            content: String::from("Great Pokémon"),
            author: String::from("Ash"),
            timestamp: time_from_millis(42).unwrap(),
            parent_id: None,
            upvotes: 0,
            downvotes: 0,
        }
    }

    #[test]
    fn absent_reads_as_empty() {
        let store = CommentStore::new(MemoryBackend::new());
        assert!(store.comments(&pikachu()).is_empty());
        assert!(store.user_votes(&pikachu()).is_empty());
        assert_eq!(store.sort_preference(&pikachu()), SortKind::New);
        assert_eq!(store.last_author(), None);
    }

    #[test]
    fn malformed_reads_as_empty() {
        let mut backend = MemoryBackend::new();
        backend.set_raw("comments:Pikachu", "[{\"id\":").unwrap();
        backend.set_raw("userVotes:Pikachu", "{\"a\":\"sideways\"}").unwrap();
        backend.set_raw("sort:Pikachu", "best").unwrap();
        let store = CommentStore::new(backend);
        assert!(store.comments(&pikachu()).is_empty());
        assert!(store.user_votes(&pikachu()).is_empty());
        assert_eq!(store.sort_preference(&pikachu()), SortKind::New);
    }

    #[test]
    fn saved_data_reads_back() {
        let mut store = CommentStore::new(MemoryBackend::new());
        let list = vec![comment("a"), comment("b")];
        store.save_comments(&pikachu(), &list).unwrap();
        let mut votes = VoteMap::new();
        votes.insert(CommentId::from("a"), UserVote::Down);
        store.save_user_votes(&pikachu(), &votes).unwrap();
        store.save_sort_preference(&pikachu(), SortKind::Top).unwrap();
        store.save_last_author("Misty").unwrap();

        assert_eq!(store.comments(&pikachu()), list);
        assert_eq!(store.user_votes(&pikachu()), votes);
        assert_eq!(store.sort_preference(&pikachu()), SortKind::Top);
        assert_eq!(store.last_author().as_deref(), Some("Misty"));
        // sort preference is a bare string, not json
        assert_eq!(
            store.backend().get_raw("sort:Pikachu").as_deref(),
            Some("top")
        );
    }

    #[test]
    fn topics_are_independent() {
        let mut store = CommentStore::new(MemoryBackend::new());
        store.save_comments(&pikachu(), &[comment("a")]).unwrap();
        assert!(store.comments(&TopicKey::new("Raichu")).is_empty());
    }

    #[test]
    fn quota_failure_is_reported() {
        let mut store = CommentStore::new(MemoryBackend::with_quota(16));
        let res = store.save_comments(&pikachu(), &[comment("a")]);
        assert_eq!(
            res,
            Err(StorageError::QuotaExceeded {
                key: String::from("comments:Pikachu")
            })
        );
        assert!(store.comments(&pikachu()).is_empty());
    }
}
