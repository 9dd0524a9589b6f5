//! Infinite, windowed feed of generated posts.

pub mod flow;
pub mod infinite;
pub mod source;
pub mod virtualizer;

pub use flow::{FeedFlow, FeedRow, Parity, RowContent};
pub use infinite::{FeedStatus, InfiniteQuery};
pub use source::{FeedPage, FeedPost, FeedSource, GeneratedFeed};
pub use virtualizer::{VirtualItem, Virtualizer};
