use std::{collections::HashMap, fmt, str::FromStr};

use crate::{CommentId, Error};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVote {
    Up,
    Down,
}

/// The current user's votes on one topic; a missing entry means no vote
pub type VoteMap = HashMap<CommentId, UserVote>;

impl fmt::Display for UserVote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserVote::Up => "up",
            UserVote::Down => "down",
        })
    }
}

impl FromStr for UserVote {
    type Err = Error;

    fn from_str(s: &str) -> Result<UserVote, Error> {
        match s {
            "up" => Ok(UserVote::Up),
            "down" => Ok(UserVote::Down),
            _ => Err(Error::UnknownVote(String::from(s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_map_layout() {
        let mut votes = VoteMap::new();
        votes.insert(CommentId::from("a"), UserVote::Up);
        assert_eq!(
            serde_json::to_value(&votes).unwrap(),
            serde_json::json!({ "a": "up" }),
        );
        let back: VoteMap = serde_json::from_str(r#"{"b":"down"}"#).unwrap();
        assert_eq!(back.get(&CommentId::from("b")), Some(&UserVote::Down));
    }
}
