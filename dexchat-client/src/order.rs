use std::cmp::{Ordering, Reverse};

use crate::api::{Comment, SortKind};

pub trait OrderExt {
    fn compare(&self, a: &Comment, b: &Comment) -> Ordering;

    /// Stable: comments that compare equal keep their relative order
    fn sort(&self, comments: &mut [Comment]) {
        comments.sort_by(|a, b| self.compare(a, b));
    }

    fn sorted(&self, comments: &[Comment]) -> Vec<Comment> {
        let mut res = comments.to_vec();
        self.sort(&mut res);
        res
    }
}

impl OrderExt for SortKind {
    fn compare(&self, a: &Comment, b: &Comment) -> Ordering {
        match self {
            SortKind::New => Reverse(a.timestamp).cmp(&Reverse(b.timestamp)),
            SortKind::Old => a.timestamp.cmp(&b.timestamp),
            SortKind::Top => (Reverse(a.score()), Reverse(a.timestamp))
                .cmp(&(Reverse(b.score()), Reverse(b.timestamp))),
        }
    }
}
