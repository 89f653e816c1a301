//! Prints a store file for `dexchat-ctl --store` filled with random threads

use std::collections::BTreeMap;

use anyhow::Context;

use dexchat_client::{
    api::{time_from_millis, Comment, CommentId, SortKind, TopicKey, UserVote, VoteMap},
    AUTHOR_KEY,
};
use rand::{seq::SliceRandom, Rng};

const QUESTIONS: &[&str] = &[
    "Who is Pikachu?",
    "What is Bulbasaur?",
    "who is mr. mime?",
    "Show me all the fire types",
];

const AUTHORS: &[&str] = &["Ash", "Misty", "Brock", "Anonymous"];

const NUM_COMMENTS_PER_TOPIC: usize = 40;
const REPLY_PROBABILITY: f64 = 0.6;
const DELETE_PROBABILITY: f64 = 0.05;
const VOTE_PROBABILITY: f64 = 0.3;
const MAX_TALLY: u32 = 25;
const COMMENT_WORD_COUNT: usize = 20;
const MAX_REPLY_DEPTH: usize = 6;

// 2022-01-01T00:00:00Z
const START_MILLIS: i64 = 1_640_995_200_000;
const MAX_GAP_MILLIS: i64 = 3_600_000;

fn gen_topic(rng: &mut impl Rng) -> anyhow::Result<(Vec<Comment>, VoteMap)> {
    let mut comments: Vec<Comment> = Vec::with_capacity(NUM_COMMENTS_PER_TOPIC);
    let mut depths: Vec<usize> = Vec::with_capacity(NUM_COMMENTS_PER_TOPIC);
    let mut ts = START_MILLIS;
    for _ in 0..NUM_COMMENTS_PER_TOPIC {
        ts += rng.gen_range(1..MAX_GAP_MILLIS);
        let parent = match comments.is_empty() || !rng.gen_bool(REPLY_PROBABILITY) {
            true => None,
            false => {
                Some(rng.gen_range(0..comments.len())).filter(|&p| depths[p] < MAX_REPLY_DEPTH)
            }
        };
        let mut c = Comment {
            id: CommentId::generate(),
            content: lipsum::lipsum_words(rng.gen_range(1..COMMENT_WORD_COUNT)),
            author: String::from(*AUTHORS.choose(rng).unwrap_or(&"Anonymous")),
            timestamp: time_from_millis(ts).context("generating timestamp")?,
            parent_id: parent.map(|p| comments[p].id.clone()),
            upvotes: rng.gen_range(0..MAX_TALLY),
            downvotes: rng.gen_range(0..MAX_TALLY),
        };
        if rng.gen_bool(DELETE_PROBABILITY) {
            c.tombstone();
        }
        depths.push(parent.map(|p| depths[p] + 1).unwrap_or(0));
        comments.push(c);
    }

    let mut votes = VoteMap::new();
    for c in comments.iter_mut().filter(|c| !c.is_deleted()) {
        if !rng.gen_bool(VOTE_PROBABILITY) {
            continue;
        }
        // the user's own vote is part of the tallies
        let vote = match rng.gen_bool(0.5) {
            true => {
                c.upvotes += 1;
                UserVote::Up
            }
            false => {
                c.downvotes += 1;
                UserVote::Down
            }
        };
        votes.insert(c.id.clone(), vote);
    }
    Ok((comments, votes))
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let mut store = BTreeMap::new();
    for q in QUESTIONS {
        let topic = TopicKey::from_question(q);
        let (comments, votes) = gen_topic(&mut rng)?;
        let sort = SortKind::ALL.choose(&mut rng).copied().unwrap_or_default();
        store.insert(
            topic.comments_key(),
            serde_json::to_string(&comments).context("serializing comments")?,
        );
        store.insert(
            topic.votes_key(),
            serde_json::to_string(&votes).context("serializing votes")?,
        );
        store.insert(topic.sort_key(), sort.to_string());
    }
    store.insert(String::from(AUTHOR_KEY), String::from("Ash"));
    println!(
        "{}",
        serde_json::to_string_pretty(&store).context("serializing store")?
    );
    Ok(())
}
