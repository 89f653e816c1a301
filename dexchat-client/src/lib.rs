mod coordinator;
pub use coordinator::{Coordinator, NewComment, Observer, ReadTicket, Snapshot};

mod fuzz;

mod memory;
pub use memory::MemoryBackend;

mod order;
pub use order::OrderExt;

mod storage;
pub use storage::{Backend, CommentStore, AUTHOR_KEY};

mod tree;
pub use tree::{build_tree, depth_of, walk, CommentNode};

mod vote;
pub use vote::{apply_vote, next_vote, set_vote};

pub mod api {
    pub use dexchat_api::*;
}

pub mod prelude {
    pub use crate::{Backend, OrderExt};
}
