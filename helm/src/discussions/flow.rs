use serde::Serialize;
use tracing::debug;

use super::cards::{CardCatalog, CardImage};
use crate::api::dto::{Discussion, DiscussionDetails, Question};
use crate::error::{FieldErrors, Result};
use crate::query::{Queries, QueryResult, QueryStatus};
use crate::router::{Location, Navigator, Route, Tab};

/// Query parameter carrying the selected discussion.
pub const DISCUSSION_ID_PARAM: &str = "discussionId";
pub const NO_DISCUSSIONS: &str = "No Discussions";
pub const NO_SELECTION_PROMPT: &str =
    "Please select a discussion or click below to create a new one!";

/// Result of submitting one of the discussion forms.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Done,
    Invalid(FieldErrors),
    /// The request failed and a notification was raised.
    Failed(String),
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscussionEntry {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscussionList {
    pub entries: Vec<DiscussionEntry>,
}

impl DiscussionList {
    pub fn from_discussions(discussions: &[Discussion], selected: Option<&str>) -> Self {
        let entries = discussions
            .iter()
            .map(|d| DiscussionEntry {
                id: d.id,
                name: d.name.clone(),
                selected: selected == Some(d.id.to_string().as_str()),
            })
            .collect();
        Self { entries }
    }

    /// Placeholder text shown instead of an empty list.
    pub fn empty_text(&self) -> Option<&'static str> {
        self.entries.is_empty().then_some(NO_DISCUSSIONS)
    }

    pub fn selected(&self) -> Option<&DiscussionEntry> {
        self.entries.iter().find(|e| e.selected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBubble {
    pub id: i64,
    pub text: String,
    pub alignment: Alignment,
}

impl From<&Question> for MessageBubble {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            text: q.text.clone(),
            // user messages sit on the right, answers on the left
            alignment: if q.from_user {
                Alignment::Right
            } else {
                Alignment::Left
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscussionView {
    pub discussion_id: String,
    pub cards: Vec<CardImage>,
    pub messages: Vec<MessageBubble>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiscussionPane {
    NoSelection { prompt: &'static str },
    Selected(DiscussionView),
}

/// Selected id from the location, ignoring an empty value.
pub fn selected_id(location: &Location) -> Option<&str> {
    location
        .query(DISCUSSION_ID_PARAM)
        .filter(|id| !id.is_empty())
}

pub fn selection_location(discussion_id: impl Into<String>) -> Location {
    Location::new(Tab::Discussions.path()).with_query(DISCUSSION_ID_PARAM, discussion_id)
}

/// Builds the discussions tab: list pane, message pane and card strip.
#[derive(Debug, Clone, Default)]
pub struct DiscussionFlow {
    catalog: CardCatalog,
}

impl DiscussionFlow {
    pub fn new(catalog: CardCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub async fn list(&self, queries: &Queries, location: &Location) -> Result<DiscussionList> {
        let discussions = queries.discussions().await?;
        Ok(DiscussionList::from_discussions(
            &discussions,
            selected_id(location),
        ))
    }

    pub async fn pane(&self, queries: &Queries, location: &Location) -> Result<DiscussionPane> {
        let id = selected_id(location);
        match queries.discussion_details(id).await? {
            QueryResult::Disabled => Ok(DiscussionPane::NoSelection {
                prompt: NO_SELECTION_PROMPT,
            }),
            QueryResult::Ready(details) => {
                // Ready is only produced for a present id
                let id = id.unwrap_or_default();
                Ok(DiscussionPane::Selected(self.view(id, &details)))
            }
        }
    }

    /// True while the first details fetch for `discussion_id` is in flight.
    pub fn details_loading(&self, queries: &Queries, discussion_id: &str) -> bool {
        queries.discussion_details_state(discussion_id).status == QueryStatus::Loading
    }

    pub fn view(&self, discussion_id: &str, details: &DiscussionDetails) -> DiscussionView {
        DiscussionView {
            discussion_id: discussion_id.to_string(),
            cards: self.catalog.images(details.card_names()),
            messages: details.questions.iter().map(MessageBubble::from).collect(),
        }
    }

    pub fn select(&self, navigator: &mut Navigator, discussion_id: i64) -> Route {
        debug!(discussion_id, "Discussion selected");
        navigator.push(selection_location(discussion_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn discussion(id: i64, name: &str) -> Discussion {
        Discussion {
            id,
            name: name.to_string(),
            user_id: None,
            created_at: None,
            cards: None,
        }
    }

    #[test]
    fn test_empty_list_placeholder() {
        let list = DiscussionList::from_discussions(&[], None);
        assert_eq!(list.empty_text(), Some("No Discussions"));
    }

    #[test]
    fn test_selected_entry_is_flagged() {
        let list = DiscussionList::from_discussions(
            &[discussion(1, "Career"), discussion(2, "Love")],
            Some("2"),
        );
        assert_eq!(list.empty_text(), None);
        assert_eq!(list.selected().map(|e| e.name.as_str()), Some("Love"));
        assert!(!list.entries[0].selected);
    }

    #[test]
    fn test_view_aligns_bubbles_and_keeps_card_order() {
        let flow = DiscussionFlow::default();
        let details = DiscussionDetails {
            questions: vec![
                Question {
                    id: 1,
                    text: "Will it rain?".into(),
                    from_user: true,
                    discussion_id: Some(9),
                    created_at: None,
                },
                Question {
                    id: 2,
                    text: "The Sun says no.".into(),
                    from_user: false,
                    discussion_id: Some(9),
                    created_at: None,
                },
            ],
            cards: Some("Sun,Moon,Nonesuch".into()),
        };

        let view = flow.view("9", &details);
        let alignments: Vec<_> = view.messages.iter().map(|m| m.alignment).collect();
        assert_eq!(alignments, vec![Alignment::Right, Alignment::Left]);

        let names: Vec<_> = view.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sun", "Moon", "Nonesuch"]);
        assert!(view.cards[2].is_missing());
    }

    #[test]
    fn test_selection_round_trips_through_location() {
        let location = selection_location("42");
        assert_eq!(location.path(), "/main/discussions");
        assert_eq!(selected_id(&location), Some("42"));
        assert_eq!(selected_id(&Location::new("/main/discussions")), None);
    }
}
