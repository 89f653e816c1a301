use crate::api::{Comment, CommentId, UserVote, VoteMap};

/// Voting again in the same direction withdraws the vote
pub fn next_vote(current: Option<UserVote>, target: UserVote) -> Option<UserVote> {
    match current == Some(target) {
        true => None,
        false => Some(target),
    }
}

/// Moves one vote on comment `id` from `from` to `to`
///
/// Callers must derive `from` from the actually stored vote, as applying the
/// same transition twice counts it twice.
pub fn apply_vote(
    comments: &[Comment],
    id: &CommentId,
    from: Option<UserVote>,
    to: Option<UserVote>,
) -> Vec<Comment> {
    comments
        .iter()
        .map(|c| {
            let mut c = c.clone();
            if c.id == *id {
                shift_tally(&mut c, from, to);
            }
            c
        })
        .collect()
}

fn shift_tally(c: &mut Comment, from: Option<UserVote>, to: Option<UserVote>) {
    let mut up = i64::from(c.upvotes);
    let mut down = i64::from(c.downvotes);
    match from {
        Some(UserVote::Up) => up -= 1,
        Some(UserVote::Down) => down -= 1,
        None => (),
    }
    match to {
        Some(UserVote::Up) => up += 1,
        Some(UserVote::Down) => down += 1,
        None => (),
    }
    if up < 0 || down < 0 {
        tracing::warn!(comment = %c.id, up, down, "vote tally went below zero, clamping");
    }
    c.upvotes = u32::try_from(up.max(0)).unwrap_or(u32::MAX);
    c.downvotes = u32::try_from(down.max(0)).unwrap_or(u32::MAX);
}

pub fn set_vote(votes: &mut VoteMap, id: &CommentId, vote: Option<UserVote>) {
    match vote {
        Some(v) => {
            votes.insert(id.clone(), v);
        }
        None => {
            votes.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::time_from_millis;

    fn comment(id: &str, up: u32, down: u32) -> Comment {
        Comment {
            id: CommentId::from(id),
            content: format!("comment {id}"),
            author: String::from("Ash"),
            timestamp: time_from_millis(1000).unwrap(),
            parent_id: None,
            upvotes: up,
            downvotes: down,
        }
    }

    #[test]
    fn toggles() {
        use UserVote::*;
        assert_eq!(next_vote(Some(Up), Up), None);
        assert_eq!(next_vote(Some(Down), Down), None);
        assert_eq!(next_vote(None, Up), Some(Up));
        assert_eq!(next_vote(Some(Up), Down), Some(Down));
        assert_eq!(next_vote(Some(Down), Up), Some(Up));
    }

    #[test]
    fn switching_moves_one_vote() {
        let list = vec![comment("a", 1, 0), comment("b", 4, 2)];
        let res = apply_vote(
            &list,
            &CommentId::from("a"),
            Some(UserVote::Up),
            Some(UserVote::Down),
        );
        assert_eq!((res[0].upvotes, res[0].downvotes), (0, 1));
        assert_eq!(res[1], list[1]);
    }

    #[test]
    fn withdrawing_a_vote() {
        let list = vec![comment("a", 0, 3)];
        let res = apply_vote(&list, &CommentId::from("a"), Some(UserVote::Down), None);
        assert_eq!((res[0].upvotes, res[0].downvotes), (0, 2));
    }

    #[test]
    fn floor_at_zero() {
        let list = vec![comment("a", 0, 0)];
        let res = apply_vote(
            &list,
            &CommentId::from("a"),
            Some(UserVote::Up),
            Some(UserVote::Down),
        );
        assert_eq!((res[0].upvotes, res[0].downvotes), (0, 1));
    }

    #[test]
    fn unknown_id_changes_nothing() {
        let list = vec![comment("a", 2, 2)];
        let res = apply_vote(&list, &CommentId::from("zzz"), None, Some(UserVote::Up));
        assert_eq!(res, list);
    }

    #[test]
    fn vote_map_updates() {
        let mut votes = VoteMap::new();
        let id = CommentId::from("a");
        set_vote(&mut votes, &id, Some(UserVote::Up));
        assert_eq!(votes.get(&id), Some(&UserVote::Up));
        set_vote(&mut votes, &id, None);
        assert!(votes.is_empty());
    }
}
