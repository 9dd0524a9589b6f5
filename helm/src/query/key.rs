use std::fmt;

/// Logical identity of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Discussions,
    DiscussionDetails { discussion_id: String },
    Profile,
}

/// Key family, used to invalidate every entry of one operation at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Discussions,
    DiscussionDetails,
    Profile,
}

impl QueryKey {
    pub fn details(discussion_id: impl Into<String>) -> Self {
        QueryKey::DiscussionDetails {
            discussion_id: discussion_id.into(),
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            QueryKey::Discussions => QueryKind::Discussions,
            QueryKey::DiscussionDetails { .. } => QueryKind::DiscussionDetails,
            QueryKey::Profile => QueryKind::Profile,
        }
    }
}

impl QueryKind {
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Discussions => "GET_DISCUSSIONS",
            QueryKind::DiscussionDetails => "GET_DISCUSSION_DETAILS",
            QueryKind::Profile => "GET_PROFILE",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::DiscussionDetails { discussion_id } => {
                write!(f, "{}[{}]", self.kind().name(), discussion_id)
            }
            other => f.write_str(other.kind().name()),
        }
    }
}
