//! Render tweet search results into HTML list markup.
//!
//! Tweet text is linkified (URLs, `@mentions`, `#hashtags`) by [`annotate`],
//! timestamps become "3 hours ago" strings via [`relative_time`], and
//! [`render::TweetRenderer`] glues both into one `<li>` per tweet.

pub mod annotate;
pub mod config;
pub mod error;
pub mod relative_time;
pub mod render;
pub mod twitter_message;
pub mod twitter_parser;

pub use annotate::{annotate, annotate_default};
pub use config::{LinkTemplates, RenderConfig};
pub use error::{ConfigError, ErrorKind, RenderError};
pub use relative_time::{relative_time, relative_time_now};
pub use render::{RenderedBatch, SkippedTweet, TweetRenderer};
pub use twitter_message::{SearchBatch, Tweet, TweetId};
pub use twitter_parser::parse_search_results;
