use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::infinite::{FeedStatus, InfiniteQuery};
use super::source::{FeedPost, FeedSource};
use super::virtualizer::{VirtualItem, Virtualizer};
use crate::config::FeedConfig;

pub const LOADING_TEXT: &str = "Loading...";
pub const LOADING_MORE_TEXT: &str = "Loading more...";
pub const END_OF_FEED_TEXT: &str = "Nothing more to load";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(index: usize) -> Self {
        if index % 2 == 1 {
            Parity::Odd
        } else {
            Parity::Even
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowContent {
    Post(FeedPost),
    Loader(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedRow {
    pub item: VirtualItem,
    pub parity: Parity,
    pub content: RowContent,
}

/// Infinite feed windowed through a virtualizer. Scrolling near the end
/// pulls the next page.
#[derive(Debug)]
pub struct FeedFlow {
    query: InfiniteQuery,
    virtualizer: Virtualizer,
}

impl FeedFlow {
    pub fn new(source: Arc<dyn FeedSource>, config: &FeedConfig) -> Self {
        Self {
            query: InfiniteQuery::new(source, config.page_size),
            virtualizer: Virtualizer::new(
                0,
                config.estimated_row_height,
                config.overscan,
                config.viewport_height,
            ),
        }
    }

    pub fn query(&self) -> &InfiniteQuery {
        &self.query
    }

    pub fn virtualizer(&self) -> &Virtualizer {
        &self.virtualizer
    }

    /// Load the first page if nothing is loaded yet, then keep loading
    /// until the rendered window no longer reaches the end.
    pub async fn load(&mut self) {
        if self.query.pages().is_empty() {
            self.query.fetch_next_page().await;
            self.fill().await;
        }
    }

    /// Rows plus a trailing loader row while more pages exist.
    pub fn row_count(&self) -> usize {
        self.query.row_count() + usize::from(self.query.has_next_page())
    }

    fn sync_count(&mut self) {
        self.virtualizer.set_count(self.row_count());
    }

    /// Resize after a fetch and chain fetches while the window still shows
    /// the loader row. Stops on the first failed page.
    async fn fill(&mut self) {
        self.sync_count();
        while self.query.error().is_none() && self.should_fetch_next() {
            debug!(rows = self.query.row_count(), "Feed window not filled");
            self.query.fetch_next_page().await;
            self.sync_count();
        }
    }

    /// `None` while pages load cleanly; the list renders instead. A failed
    /// page shows its error even when earlier rows are loaded.
    pub fn status_text(&self) -> Option<String> {
        match self.query.status() {
            FeedStatus::Pending => Some(LOADING_TEXT.to_string()),
            FeedStatus::Error(e) => Some(format!("Error: {}", e.user_message())),
            FeedStatus::Ready => None,
        }
    }

    /// Shown below the list once the feed is exhausted.
    pub fn footer(&self) -> Option<&'static str> {
        (self.query.status() == FeedStatus::Ready && !self.query.has_next_page())
            .then_some(END_OF_FEED_TEXT)
    }

    pub fn should_fetch_next(&self) -> bool {
        let Some(last) = self.virtualizer.virtual_items().last().copied() else {
            return false;
        };
        last.index + 1 >= self.query.row_count()
            && self.query.has_next_page()
            && !self.query.is_fetching_next_page()
    }

    /// Scroll and, when the window reaches the end, fetch the next page.
    /// Returns whether a page was fetched.
    pub async fn scroll_to(&mut self, offset: u64) -> bool {
        self.virtualizer.scroll_to(offset);
        if !self.should_fetch_next() {
            return false;
        }
        debug!(offset, rows = self.query.row_count(), "Feed end reached");
        let fetched = self.query.fetch_next_page().await;
        self.fill().await;
        fetched
    }

    pub fn measure(&mut self, index: usize, size: u32) {
        self.virtualizer.measure(index, size);
    }

    pub fn total_size(&self) -> u64 {
        self.virtualizer.total_size()
    }

    pub fn visible_rows(&self) -> Vec<FeedRow> {
        let loaded = self.query.row_count();
        let items = self.virtualizer.virtual_items();
        let first = items.first().map_or(0, |item| item.index);
        let mut posts = self.query.rows().skip(first);

        items
            .into_iter()
            .map(|item| {
                let content = if item.index >= loaded {
                    RowContent::Loader(if self.query.has_next_page() {
                        LOADING_MORE_TEXT
                    } else {
                        END_OF_FEED_TEXT
                    })
                } else {
                    match posts.next() {
                        Some(post) => RowContent::Post(post.clone()),
                        None => RowContent::Loader(LOADING_MORE_TEXT),
                    }
                };
                FeedRow {
                    parity: Parity::of(item.index),
                    item,
                    content,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HelmError, Result};
    use crate::feed::source::{FeedPage, GeneratedFeed};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    fn config() -> FeedConfig {
        FeedConfig {
            page_delay_ms: 0,
            ..FeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_status_then_rows() {
        let mut flow = FeedFlow::new(Arc::new(GeneratedFeed::new(Duration::ZERO, None)), &config());
        assert_eq!(flow.status_text().as_deref(), Some("Loading..."));

        flow.load().await;
        assert_eq!(flow.status_text(), None);
        assert_eq!(flow.row_count(), 11);

        let rows = flow.visible_rows();
        assert_eq!(rows[0].parity, Parity::Even);
        assert_eq!(rows[1].parity, Parity::Odd);
        assert!(matches!(rows[0].content, RowContent::Post(_)));
    }

    #[tokio::test]
    async fn test_scrolling_to_end_loads_next_page() {
        let mut flow = FeedFlow::new(Arc::new(GeneratedFeed::new(Duration::ZERO, None)), &config());
        flow.load().await;

        // rows 0..=8 rendered at the top, the last row is still out of reach
        assert!(!flow.should_fetch_next());
        assert!(!flow.scroll_to(0).await);

        assert!(flow.scroll_to(flow.total_size()).await);
        assert_eq!(flow.query().row_count(), 20);
        assert_eq!(flow.row_count(), 21);

        assert!(!flow.scroll_to(0).await);
        assert!(flow.scroll_to(flow.total_size()).await);
        assert_eq!(flow.query().row_count(), 30);
    }

    #[tokio::test]
    async fn test_loader_row_at_bottom() {
        let mut flow = FeedFlow::new(Arc::new(GeneratedFeed::new(Duration::ZERO, None)), &config());
        flow.load().await;
        let end = flow.total_size();
        flow.virtualizer.scroll_to(end);

        let rows = flow.visible_rows();
        let last = rows.last().unwrap();
        assert_eq!(last.item.index, 10);
        assert_eq!(last.parity, Parity::Even);
        assert_eq!(last.content, RowContent::Loader("Loading more..."));
    }

    #[tokio::test]
    async fn test_end_of_feed() {
        let mut flow = FeedFlow::new(
            Arc::new(GeneratedFeed::new(Duration::ZERO, Some(10))),
            &config(),
        );
        flow.load().await;

        assert_eq!(flow.row_count(), 10);
        assert_eq!(flow.footer(), Some("Nothing more to load"));
        assert!(!flow.scroll_to(flow.total_size()).await);
    }

    #[tokio::test]
    async fn test_tall_viewport_loads_until_filled() {
        let config = FeedConfig {
            viewport_height: 5000,
            ..config()
        };
        let mut flow = FeedFlow::new(Arc::new(GeneratedFeed::new(Duration::ZERO, None)), &config);
        flow.load().await;

        assert!(flow.query().pages().len() > 1);
        assert!(!flow.should_fetch_next());
        // every rendered row is a post, the loader sits below the window
        assert!(flow
            .visible_rows()
            .iter()
            .all(|row| matches!(row.content, RowContent::Post(_))));
    }

    /// Serves the first page, then fails.
    struct FailsAfterFirst {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl FeedSource for FailsAfterFirst {
        async fn fetch_page(&self, limit: usize, offset: u64) -> Result<FeedPage> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call > 1 {
                return Err(HelmError::Transport("offline".into()));
            }
            GeneratedFeed::new(Duration::ZERO, None)
                .fetch_page(limit, offset)
                .await
        }
    }

    #[tokio::test]
    async fn test_next_page_error_is_shown() {
        let source = Arc::new(FailsAfterFirst {
            calls: Mutex::new(0),
        });
        let mut flow = FeedFlow::new(source, &config());
        flow.load().await;
        assert_eq!(flow.status_text(), None);

        assert!(flow.scroll_to(flow.total_size()).await);
        assert_eq!(
            flow.status_text().as_deref(),
            Some("Error: Network error: offline")
        );
        assert_eq!(flow.footer(), None);
        assert_eq!(flow.query().row_count(), 10);
    }
}
