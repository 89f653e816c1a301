use std::collections::{HashMap, HashSet};

use crate::{
    api::{Comment, CommentId, SortKind},
    OrderExt,
};

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct CommentNode {
    pub comment: Comment,

    /// Replies, sorted among themselves
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn find_in<'a>(forest: &'a [CommentNode], id: &CommentId) -> Option<&'a CommentNode> {
        for n in forest {
            if n.comment.id == *id {
                return Some(n);
            }
            if let Some(res) = CommentNode::find_in(&n.children, id) {
                return Some(res);
            }
        }
        None
    }
}

type ByParent<'a> = HashMap<Option<&'a CommentId>, Vec<&'a Comment>>;

/// Builds the reply forest of a topic, sorting every level independently
///
/// Comments whose parent is not in `comments` are unreachable and left out.
pub fn build_tree(comments: &[Comment], kind: SortKind) -> Vec<CommentNode> {
    let mut by_parent = ByParent::new();
    for c in comments {
        by_parent.entry(c.parent_id.as_ref()).or_default().push(c);
    }
    let mut path = HashSet::new();
    build_level(&by_parent, None, kind, &mut path)
}

fn build_level<'a>(
    by_parent: &ByParent<'a>,
    parent: Option<&'a CommentId>,
    kind: SortKind,
    path: &mut HashSet<&'a CommentId>,
) -> Vec<CommentNode> {
    let mut level = by_parent.get(&parent).cloned().unwrap_or_default();
    level.sort_by(|a, b| kind.compare(a, b));
    let mut res = Vec::with_capacity(level.len());
    for c in level {
        // duplicated ids could otherwise make a comment its own descendant
        if !path.insert(&c.id) {
            tracing::warn!(comment = %c.id, "comment is its own ancestor, skipping");
            continue;
        }
        let children = build_level(by_parent, Some(&c.id), kind, path);
        path.remove(&c.id);
        res.push(CommentNode {
            comment: c.clone(),
            children,
        });
    }
    res
}

/// Depth-first pre-order listing of `forest` with the depth of each comment
///
/// Roots are at depth 0, comments deeper than `max_depth` are not listed.
pub fn walk(forest: &[CommentNode], max_depth: usize) -> Vec<(usize, &Comment)> {
    let mut res = Vec::new();
    let mut stack = forest.iter().rev().map(|n| (0, n)).collect::<Vec<_>>();
    while let Some((depth, node)) = stack.pop() {
        res.push((depth, &node.comment));
        if depth < max_depth {
            stack.extend(node.children.iter().rev().map(|n| (depth + 1, n)));
        }
    }
    res
}

/// Number of ancestors of `id`, roots being at depth 0
///
/// Returns None if `id` is not there, or if its ancestry loops or reaches a
/// comment that is not in `comments`.
pub fn depth_of(comments: &[Comment], id: &CommentId) -> Option<usize> {
    let parents = comments
        .iter()
        .map(|c| (&c.id, c.parent_id.as_ref()))
        .collect::<HashMap<_, _>>();
    let mut current = *parents.get(id)?;
    let mut depth = 0;
    while let Some(p) = current {
        depth += 1;
        if depth > comments.len() {
            return None;
        }
        current = *parents.get(p)?;
    }
    Some(depth)
}
