use std::sync::Arc;

use tracing::{debug, warn};

use super::source::{FeedPage, FeedPost, FeedSource};
use crate::error::{HelmError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    /// First page not loaded yet.
    Pending,
    /// The last page fetch failed. Loaded pages are kept.
    Error(HelmError),
    Ready,
}

/// Paged list where each page names the offset of the next one.
pub struct InfiniteQuery {
    source: Arc<dyn FeedSource>,
    page_size: usize,
    pages: Vec<FeedPage>,
    fetching: bool,
    error: Option<HelmError>,
}

impl InfiniteQuery {
    pub fn new(source: Arc<dyn FeedSource>, page_size: usize) -> Self {
        Self {
            source,
            page_size,
            pages: Vec::new(),
            fetching: false,
            error: None,
        }
    }

    pub fn status(&self) -> FeedStatus {
        match (&self.error, self.pages.is_empty()) {
            (Some(e), _) => FeedStatus::Error(e.clone()),
            (None, true) => FeedStatus::Pending,
            (None, false) => FeedStatus::Ready,
        }
    }

    pub fn error(&self) -> Option<&HelmError> {
        self.error.as_ref()
    }

    pub fn pages(&self) -> &[FeedPage] {
        &self.pages
    }

    /// All loaded rows, in fetch order.
    pub fn rows(&self) -> impl Iterator<Item = &FeedPost> {
        self.pages.iter().flat_map(|page| page.rows.iter())
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|page| page.rows.len()).sum()
    }

    pub fn has_next_page(&self) -> bool {
        self.pages
            .last()
            .is_some_and(|page| page.next_offset.is_some())
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.fetching && !self.pages.is_empty()
    }

    /// Offset of the page to fetch now, marking the fetch in flight. The
    /// first page starts at 0.
    pub fn begin_next(&mut self) -> Option<u64> {
        if self.fetching {
            return None;
        }
        let offset = match self.pages.last() {
            None => 0,
            Some(page) => page.next_offset?,
        };
        self.fetching = true;
        Some(offset)
    }

    pub fn complete(&mut self, offset: u64, result: Result<FeedPage>) {
        self.fetching = false;
        match result {
            Ok(page) => {
                debug!(offset, rows = page.rows.len(), "Feed page loaded");
                self.error = None;
                self.pages.push(page);
            }
            Err(e) => {
                warn!(offset, error = %e, "Feed page failed");
                self.error = Some(e);
            }
        }
    }

    /// Fetch the next page if one is due. Returns whether a page was requested.
    pub async fn fetch_next_page(&mut self) -> bool {
        let Some(offset) = self.begin_next() else {
            return false;
        };
        let source = Arc::clone(&self.source);
        let result = source.fetch_page(self.page_size, offset).await;
        self.complete(offset, result);
        true
    }
}

impl std::fmt::Debug for InfiniteQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfiniteQuery")
            .field("page_size", &self.page_size)
            .field("pages", &self.pages.len())
            .field("fetching", &self.fetching)
            .field("error", &self.error)
            .finish()
    }
}
