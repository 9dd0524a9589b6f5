use std::time::Duration;

use async_trait::async_trait;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: String,
    pub user_message: String,
    pub ai_message: String,
}

/// One page of the feed. `next_offset` is the row offset of the following
/// page, or `None` at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub rows: Vec<FeedPost>,
    pub next_offset: Option<u64>,
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self, limit: usize, offset: u64) -> Result<FeedPage>;
}

/// Synthetic posts standing in for a feed backend.
#[derive(Debug, Clone)]
pub struct GeneratedFeed {
    delay: Duration,
    max_posts: Option<u64>,
}

impl GeneratedFeed {
    pub fn new(delay: Duration, max_posts: Option<u64>) -> Self {
        Self { delay, max_posts }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(Duration::from_millis(config.page_delay_ms), config.max_posts)
    }
}

#[async_trait]
impl FeedSource for GeneratedFeed {
    async fn fetch_page(&self, limit: usize, offset: u64) -> Result<FeedPage> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let remaining = self
            .max_posts
            .map_or(limit as u64, |max| max.saturating_sub(offset));
        let count = remaining.min(limit as u64) as usize;

        let rows: Vec<FeedPost> = (0..count)
            .map(|_| FeedPost {
                id: nanoid!(),
                user_message: "this is my prediction for today".to_string(),
                ai_message: "you will be lucky".to_string(),
            })
            .collect();

        let end = offset + rows.len() as u64;
        let exhausted = rows.is_empty() || self.max_posts.is_some_and(|max| end >= max);
        let next_offset = (!exhausted).then_some(end);

        debug!(offset, rows = rows.len(), ?next_offset, "Feed page generated");
        Ok(FeedPage { rows, next_offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_next_offset_counts_rows() {
        let feed = GeneratedFeed::new(Duration::ZERO, None);
        let page = feed.fetch_page(10, 20).await.unwrap();

        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.next_offset, Some(30));
        assert_eq!(page.rows[0].ai_message, "you will be lucky");
        assert_ne!(page.rows[0].id, page.rows[1].id);
    }

    #[tokio::test]
    async fn test_stops_at_max_posts() {
        let feed = GeneratedFeed::new(Duration::ZERO, Some(25));

        let page = feed.fetch_page(10, 20).await.unwrap();
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.next_offset, None);

        let past_end = feed.fetch_page(10, 40).await.unwrap();
        assert!(past_end.rows.is_empty());
        assert_eq!(past_end.next_offset, None);
    }
}
