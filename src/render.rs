//! Builds the `<li>` list markup for a batch of search results.

use crate::annotate::{annotate, escape_html};
use crate::config::{expand, RenderConfig};
use crate::error::RenderError;
use crate::relative_time::relative_time;
use crate::twitter_message::{SearchBatch, Tweet};
use chrono::{DateTime, TimeZone, Utc};

/// A record that was dropped from the output.
#[derive(Debug)]
pub struct SkippedTweet {
    /// Position in the batch.
    pub index: usize,
    pub id: Option<String>,
    pub error: RenderError,
}

#[derive(Debug, Default)]
pub struct RenderedBatch {
    pub html: String,
    pub rendered: usize,
    pub skipped: Vec<SkippedTweet>,
}

impl RenderedBatch {
    /// True when at least one record inside the display window was skipped.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    fn push(&mut self, index: usize, id: Option<String>, result: Result<String, RenderError>) {
        match result {
            Ok(fragment) => {
                self.html.push_str(&fragment);
                self.rendered += 1;
            }
            Err(error) => {
                tracing::warn!(index, id = ?id, error = %error, "Skipping tweet that failed to render");
                self.skipped.push(SkippedTweet { index, id, error });
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TweetRenderer {
    config: RenderConfig,
}

impl TweetRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one tweet as an `<li>` fragment.
    pub fn render_tweet<Tz: TimeZone>(
        &self,
        tweet: &Tweet,
        now: &DateTime<Tz>,
    ) -> Result<String, RenderError> {
        let user = tweet.from_user.trim();
        if user.is_empty() {
            return Err(RenderError::MalformedInput(format!(
                "tweet {} has no author",
                tweet.id
            )));
        }

        let when = relative_time(&tweet.created_at, now)?;
        let text = annotate(&tweet.text, &self.config.links);
        let id = tweet.id.to_string();
        let permalink = expand(
            &self.config.permalink_template,
            &[
                ("user", urlencoding::encode(user).as_ref()),
                ("id", urlencoding::encode(&id).as_ref()),
            ],
        );
        let user = escape_html(user);

        let mut li = String::from("<li>");
        if let Some(src) = tweet.profile_image_url.as_deref().filter(|s| !s.is_empty()) {
            li.push_str(&format!(
                "<img class=\"avatar\" src=\"{}\" alt=\"{}\" /> ",
                escape_html(src),
                user
            ));
        }
        li.push_str(&format!(
            "<span class=\"author\">{}</span> <span>{}</span> <a style=\"font-size:85%\" href=\"{}\">{}</a></li>",
            user,
            text,
            escape_html(&permalink),
            when
        ));

        Ok(li)
    }

    /// Render the first `max_rendered_items` tweets, skipping any that fail.
    pub fn render_tweets<Tz: TimeZone>(&self, tweets: &[Tweet], now: &DateTime<Tz>) -> RenderedBatch {
        let mut out = RenderedBatch::default();
        for (index, tweet) in tweets.iter().take(self.config.max_rendered_items).enumerate() {
            out.push(index, Some(tweet.id.to_string()), self.render_tweet(tweet, now));
        }
        log_summary(&out);
        out
    }

    /// Render the first `max_rendered_items` records of a raw search batch.
    /// Malformed records count toward the limit and are skipped, not replaced.
    pub fn render_batch<Tz: TimeZone>(&self, batch: &SearchBatch, now: &DateTime<Tz>) -> RenderedBatch {
        let mut out = RenderedBatch::default();
        for index in 0..batch.len().min(self.config.max_rendered_items) {
            let result = batch
                .tweet_at(index)
                .and_then(|tweet| self.render_tweet(&tweet, now));
            out.push(index, batch.raw_id(index), result);
        }
        log_summary(&out);
        out
    }

    pub fn render_batch_now(&self, batch: &SearchBatch) -> RenderedBatch {
        self.render_batch(batch, &Utc::now())
    }
}

fn log_summary(out: &RenderedBatch) {
    tracing::debug!(
        rendered = out.rendered,
        skipped = out.skipped.len(),
        "Rendered tweet list"
    );
}
