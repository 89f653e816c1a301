#![cfg(test)]

use std::collections::HashSet;

use crate::{
    api::{time_from_millis, Comment, CommentId, SortKind, UserVote},
    apply_vote, build_tree, walk, CommentNode, OrderExt,
};

// (timestamp, parent index, upvotes, downvotes)
type RawComment = (i16, Option<u8>, u8, u8);

fn comments_from(raw: &[RawComment]) -> Vec<Comment> {
    let len = raw.len();
    raw.iter()
        .enumerate()
        .map(|(i, (ts, parent, up, down))| Comment {
            id: CommentId(format!("c{i}")),
            content: format!("comment {i}"),
            author: String::from("Ash"),
            timestamp: time_from_millis(i64::from(*ts)).unwrap(),
            parent_id: parent.map(|p| CommentId(format!("c{}", usize::from(p) % len))),
            upvotes: u32::from(*up),
            downvotes: u32::from(*down),
        })
        .collect()
}

fn vote(v: Option<bool>) -> Option<UserVote> {
    v.map(|up| match up {
        true => UserVote::Up,
        false => UserVote::Down,
    })
}

#[test]
fn apply_vote_only_touches_target() {
    bolero::check!()
        .with_type::<(Vec<RawComment>, u8, Option<bool>, Option<bool>)>()
        .cloned()
        .for_each(|(raw, target, from, to)| {
            let list = comments_from(&raw);
            let id = CommentId(format!("c{target}"));
            let res = apply_vote(&list, &id, vote(from), vote(to));
            assert_eq!(res.len(), list.len());
            for (before, after) in list.iter().zip(res.iter()) {
                if before.id != id {
                    assert_eq!(before, after);
                    continue;
                }
                let expected = |count: u32, is_up: bool| {
                    let mut count = i64::from(count);
                    if from == Some(is_up) {
                        count -= 1;
                    }
                    if to == Some(is_up) {
                        count += 1;
                    }
                    count.max(0) as u32
                };
                assert_eq!(after.upvotes, expected(before.upvotes, true));
                assert_eq!(after.downvotes, expected(before.downvotes, false));
                assert_eq!(after.content, before.content);
                assert_eq!(after.timestamp, before.timestamp);
            }
        })
}

#[test]
fn new_is_reversed_old() {
    bolero::check!()
        .with_type::<Vec<RawComment>>()
        .cloned()
        .for_each(|raw| {
            let mut seen = HashSet::new();
            let raw = raw
                .into_iter()
                .filter(|(ts, ..)| seen.insert(*ts))
                .collect::<Vec<_>>();
            let list = comments_from(&raw);
            let mut new = SortKind::New.sorted(&list);
            new.reverse();
            assert_eq!(new, SortKind::Old.sorted(&list));
        })
}

fn check_level(level: &[CommentNode], kind: SortKind, seen: &mut HashSet<CommentId>) {
    for pair in level.windows(2) {
        assert_ne!(
            kind.compare(&pair[0].comment, &pair[1].comment),
            std::cmp::Ordering::Greater
        );
    }
    for n in level {
        assert!(seen.insert(n.comment.id.clone()), "comment listed twice");
        for c in &n.children {
            assert_eq!(c.comment.parent_id.as_ref(), Some(&n.comment.id));
        }
        check_level(&n.children, kind, seen);
    }
}

#[test]
fn tree_levels_are_sorted_and_disjoint() {
    bolero::check!()
        .with_type::<(Vec<RawComment>, u8)>()
        .cloned()
        .for_each(|(raw, kind)| {
            let kind = SortKind::ALL[usize::from(kind) % SortKind::ALL.len()];
            let list = comments_from(&raw);
            let forest = build_tree(&list, kind);
            for root in &forest {
                assert!(root.comment.parent_id.is_none());
            }
            let mut seen = HashSet::new();
            check_level(&forest, kind, &mut seen);
            let roots = list.iter().filter(|c| c.parent_id.is_none()).count();
            assert_eq!(forest.len(), roots);
            assert_eq!(walk(&forest, usize::MAX).len(), seen.len());
        })
}
