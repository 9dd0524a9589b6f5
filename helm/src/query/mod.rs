//! Query layer: cached reads keyed by [`QueryKey`], writes tracked by
//! [`MutationState`] and invalidating the reads declared by [`MutationKey`].

pub mod cache;
pub mod hooks;
pub mod key;
pub mod mutation;

pub use cache::{QueryCache, QuerySnapshot, QueryStatus};
pub use hooks::{Queries, QueryResult};
pub use key::{QueryKey, QueryKind};
pub use mutation::{MutationKey, MutationState};
