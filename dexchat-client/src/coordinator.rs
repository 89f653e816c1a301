use std::sync::Arc;

use crate::{
    api::{
        self, Comment, CommentId, Error, Limits, SortKind, StorageError, TopicKey, UserVote,
        VoteMap,
    },
    apply_vote, build_tree, depth_of, next_vote, set_vote, Backend, CommentNode, CommentStore,
};

/// State of one topic as shown to the user
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    pub comments: Arc<Vec<Comment>>,
    pub votes: Arc<VoteMap>,
}

impl Snapshot {
    pub fn find(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == *id)
    }

    pub fn vote_for(&self, id: &CommentId) -> Option<UserVote> {
        self.votes.get(id).copied()
    }

    pub fn tree(&self, kind: SortKind) -> Vec<CommentNode> {
        build_tree(&self.comments, kind)
    }
}

pub trait Observer {
    fn on_change(&mut self, snapshot: &Snapshot);

    /// Called once per failed write, after the previous state was republished
    fn on_error(&mut self, _err: &Error) {}
}

/// Handle on a read started with `Coordinator::begin_read`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadTicket {
    generation: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewComment {
    pub content: String,
    pub author: Option<String>,
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    pub fn root(content: impl Into<String>, author: Option<String>) -> NewComment {
        NewComment {
            content: content.into(),
            author,
            parent_id: None,
        }
    }

    pub fn reply(parent: CommentId, content: impl Into<String>, author: Option<String>) -> NewComment {
        NewComment {
            content: content.into(),
            author,
            parent_id: Some(parent),
        }
    }
}

/// Sole writer of one topic's comments and votes
///
/// Every mutation is validated, published optimistically to the observers,
/// then written through. If the write fails the last known good state is
/// published again and the error is reported to the observers once.
///
/// Several tabs writing the same topic is not detected: the last write wins.
pub struct Coordinator<B> {
    store: CommentStore<B>,
    topic: TopicKey,
    limits: Limits,
    current: Snapshot,
    generation: u64,
    observers: Vec<Box<dyn Observer>>,
}

impl<B: Backend> Coordinator<B> {
    pub fn new(store: CommentStore<B>, topic: TopicKey, limits: Limits) -> Coordinator<B> {
        let mut res = Coordinator {
            store,
            topic,
            limits,
            current: Snapshot::default(),
            generation: 0,
            observers: Vec::new(),
        };
        res.current = res.read_durable();
        res
    }

    pub fn topic(&self) -> &TopicKey {
        &self.topic
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    pub fn store(&self) -> &CommentStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CommentStore<B> {
        &mut self.store
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn tree(&self, kind: SortKind) -> Vec<CommentNode> {
        self.current.tree(kind)
    }

    pub fn sort_preference(&self) -> SortKind {
        self.store.sort_preference(&self.topic)
    }

    pub fn set_sort_preference(&mut self, kind: SortKind) -> Result<(), Error> {
        Ok(self.store.save_sort_preference(&self.topic, kind)?)
    }

    pub fn preferred_tree(&self) -> Vec<CommentNode> {
        self.tree(self.sort_preference())
    }

    /// Author to prefill new comments with
    pub fn suggested_author(&self) -> String {
        self.store
            .last_author()
            .unwrap_or_else(|| self.limits.default_author.clone())
    }

    pub fn read_durable(&self) -> Snapshot {
        Snapshot {
            comments: Arc::new(self.store.comments(&self.topic)),
            votes: Arc::new(self.store.user_votes(&self.topic)),
        }
    }

    /// Starts a read, superseding every read or mutation started before
    pub fn begin_read(&mut self) -> ReadTicket {
        self.generation += 1;
        ReadTicket {
            generation: self.generation,
        }
    }

    /// Publishes the result of a read, unless something newer started since
    pub fn finish_read(&mut self, ticket: ReadTicket, snapshot: Snapshot) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(topic = %self.topic, "dropping superseded read");
            return false;
        }
        self.current = snapshot;
        self.publish();
        true
    }

    pub fn refresh(&mut self) {
        let ticket = self.begin_read();
        let snapshot = self.read_durable();
        self.finish_read(ticket, snapshot);
    }

    pub fn create(&mut self, new: NewComment) -> Result<CommentId, Error> {
        tracing::debug!(topic = %self.topic, parent = ?new.parent_id, "creating comment");
        let base = self.read_durable();
        let content = self.limits.check_content(&new.content)?;
        if let Some(parent) = &new.parent_id {
            live_comment(&base, parent)?;
            let depth = depth_of(&base.comments, parent)
                .ok_or_else(|| Error::DetachedComment(parent.clone()))?;
            if depth >= self.limits.max_reply_depth {
                return Err(Error::ReplyTooDeep(
                    parent.clone(),
                    self.limits.max_reply_depth,
                ));
            }
        }
        let author = self.limits.author_or_default(new.author.as_deref());
        let comment = Comment::new(content, author.clone(), new.parent_id, api::now());
        let id = comment.id.clone();

        let mut comments = (*base.comments).clone();
        comments.push(comment);
        let next = Snapshot {
            comments: Arc::new(comments),
            votes: base.votes.clone(),
        };
        self.commit("create", &base, next)?;

        if let Err(err) = self.store.save_last_author(&author) {
            tracing::warn!(%err, "failed remembering comment author");
        }
        Ok(id)
    }

    /// Changes content and, if given, author; everything else is kept
    pub fn edit(
        &mut self,
        id: &CommentId,
        content: &str,
        author: Option<&str>,
    ) -> Result<(), Error> {
        tracing::debug!(topic = %self.topic, comment = %id, "editing comment");
        let base = self.read_durable();
        let target = live_comment(&base, id)?;
        let content = self.limits.check_content(content)?;
        let author = match author {
            Some(a) => self.limits.author_or_default(Some(a)),
            None => target.author.clone(),
        };

        let comments = base
            .comments
            .iter()
            .map(|c| match c.id == *id {
                true => Comment {
                    content: content.clone(),
                    author: author.clone(),
                    ..c.clone()
                },
                false => c.clone(),
            })
            .collect();
        let next = Snapshot {
            comments: Arc::new(comments),
            votes: base.votes.clone(),
        };
        self.commit("edit", &base, next)
    }

    /// Replaces the content by a tombstone so that replies stay attached
    pub fn delete(&mut self, id: &CommentId) -> Result<(), Error> {
        tracing::debug!(topic = %self.topic, comment = %id, "deleting comment");
        let base = self.read_durable();
        match base.find(id) {
            None => return Err(Error::UnknownComment(id.clone())),
            Some(c) if c.is_deleted() => return Ok(()),
            Some(_) => (),
        }

        let mut comments = (*base.comments).clone();
        for c in comments.iter_mut().filter(|c| c.id == *id) {
            c.tombstone();
        }
        let next = Snapshot {
            comments: Arc::new(comments),
            votes: base.votes.clone(),
        };
        self.commit("delete", &base, next)
    }

    /// Votes `target` on `id`, or withdraws the vote if it already was `target`
    ///
    /// Returns the user's vote on `id` after the operation.
    pub fn vote(&mut self, id: &CommentId, target: UserVote) -> Result<Option<UserVote>, Error> {
        tracing::debug!(topic = %self.topic, comment = %id, %target, "voting");
        let base = self.read_durable();
        live_comment(&base, id)?;
        let from = base.vote_for(id);
        let to = next_vote(from, target);

        let mut votes = (*base.votes).clone();
        set_vote(&mut votes, id, to);
        let next = Snapshot {
            comments: Arc::new(apply_vote(&base.comments, id, from, to)),
            votes: Arc::new(votes),
        };
        self.commit("vote", &base, next)?;
        Ok(to)
    }

    fn commit(&mut self, op: &'static str, base: &Snapshot, next: Snapshot) -> Result<(), Error> {
        let previous = self.current.clone();
        self.generation += 1;
        self.current = next.clone();
        self.publish();

        match self.write_through(base, &next) {
            Ok(()) => {
                self.current = self.read_durable();
                self.publish();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(topic = %self.topic, op, %err, "write failed, rolling back");
                self.current = previous;
                self.publish();
                let err = Error::from(err);
                for o in self.observers.iter_mut() {
                    o.on_error(&err);
                }
                Err(err)
            }
        }
    }

    fn write_through(&mut self, base: &Snapshot, next: &Snapshot) -> Result<(), StorageError> {
        let comments_changed = base.comments != next.comments;
        if comments_changed {
            self.store.save_comments(&self.topic, &next.comments)?;
        }
        if base.votes != next.votes {
            if let Err(err) = self.store.save_user_votes(&self.topic, &next.votes) {
                if comments_changed {
                    if let Err(restore_err) = self.store.save_comments(&self.topic, &base.comments)
                    {
                        tracing::error!(
                            topic = %self.topic,
                            %restore_err,
                            "failed restoring comments, tallies and votes may disagree"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn publish(&mut self) {
        for o in self.observers.iter_mut() {
            o.on_change(&self.current);
        }
    }
}

fn live_comment<'a>(snapshot: &'a Snapshot, id: &CommentId) -> Result<&'a Comment, Error> {
    match snapshot.find(id) {
        None => Err(Error::UnknownComment(id.clone())),
        Some(c) if c.is_deleted() => Err(Error::CommentDeleted(id.clone())),
        Some(c) => Ok(c),
    }
}
