use crate::{Error, DELETED_CONTENT};

pub const MAX_CONTENT_LEN: usize = 500;
pub const MAX_REPLY_DEPTH: usize = 6;
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Input constraints enforced before any mutation reaches storage
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Limits {
    /// In characters, after trimming
    pub max_content_len: usize,

    /// Comments at this depth (roots are at depth 0) can no longer be replied to
    pub max_reply_depth: usize,

    pub default_author: String,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_content_len: MAX_CONTENT_LEN,
            max_reply_depth: MAX_REPLY_DEPTH,
            default_author: String::from(DEFAULT_AUTHOR),
        }
    }
}

impl Limits {
    /// Returns the trimmed content if it can be stored
    pub fn check_content(&self, content: &str) -> Result<String, Error> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::EmptyContent);
        }
        let len = content.chars().count();
        if len > self.max_content_len {
            return Err(Error::ContentTooLong {
                len,
                max: self.max_content_len,
            });
        }
        if content == DELETED_CONTENT {
            return Err(Error::ReservedContent(String::from(content)));
        }
        Ok(String::from(content))
    }

    pub fn author_or_default(&self, author: Option<&str>) -> String {
        match author.map(str::trim) {
            Some(a) if !a.is_empty() => String::from(a),
            _ => self.default_author.clone(),
        }
    }
}
