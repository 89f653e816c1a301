use std::fmt;

const DEFAULT_TOPIC: &str = "default";
const MAX_SLUG_LEN: usize = 50;

mod topic_parser {
    #[derive(pest_derive::Parser)]
    #[grammar = "topic.pest"]
    pub struct Parser;
}

/// Partition key for everything stored about one question
///
/// Derived deterministically from the question text, so that asking the same
/// question again, even in another session, shows the same comments.
#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct TopicKey(String);

impl TopicKey {
    /// Use `key` as-is, without deriving it from a question
    pub fn new(key: impl Into<String>) -> TopicKey {
        TopicKey(key.into())
    }

    /// "Who is Ivysaur?" gives "Ivysaur", anything else gives a slug of the text
    pub fn from_question(question: &str) -> TopicKey {
        if question.is_empty() {
            return TopicKey::new(DEFAULT_TOPIC);
        }
        if let Some(subject) = question_subject(question) {
            return TopicKey(subject);
        }
        let slug = slugify(question);
        match slug.is_empty() {
            true => TopicKey::new(DEFAULT_TOPIC),
            false => TopicKey(slug),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn comments_key(&self) -> String {
        format!("comments:{}", self.0)
    }

    pub fn votes_key(&self) -> String {
        format!("userVotes:{}", self.0)
    }

    pub fn sort_key(&self) -> String {
        format!("sort:{}", self.0)
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn question_subject(text: &str) -> Option<String> {
    use pest::Parser;
    use topic_parser::Rule;

    let pairs = topic_parser::Parser::parse(Rule::everything, text).ok()?;
    pairs
        .flatten()
        .find(|p| p.as_rule() == Rule::subject)
        .map(|p| p.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn slugify(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.to_lowercase().trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                res.push('-');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            res.push(c);
        }
    }
    // only ascii is left at this point
    res.truncate(MAX_SLUG_LEN);
    res
}
