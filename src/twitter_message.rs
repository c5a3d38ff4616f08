use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tweet identifier as sent by the search API (numeric in `id`, textual in `id_str`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TweetId {
    Num(u64),
    Str(String),
}

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TweetId::Num(n) => write!(f, "{}", n),
            TweetId::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub text: String,
    pub from_user: String,
    pub id: TweetId,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// One search response. Records stay untyped until rendered so a single bad
/// record cannot fail the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchBatch {
    pub results: Vec<serde_json::Value>,
}

impl SearchBatch {
    pub fn from_tweets(tweets: &[Tweet]) -> Self {
        let results = tweets
            .iter()
            .filter_map(|t| serde_json::to_value(t).ok())
            .collect();
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Convert the record at `index` into a [`Tweet`].
    pub fn tweet_at(&self, index: usize) -> Result<Tweet, RenderError> {
        let record = self.results.get(index).ok_or_else(|| {
            RenderError::MalformedInput(format!("no result at index {}", index))
        })?;

        Tweet::deserialize(record)
            .map_err(|e| RenderError::MalformedInput(format!("result {}: {}", index, e)))
    }

    /// Best-effort id of a record, used when reporting a skipped tweet.
    pub fn raw_id(&self, index: usize) -> Option<String> {
        let record = self.results.get(index)?;
        match record.get("id_str").or_else(|| record.get("id"))? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
