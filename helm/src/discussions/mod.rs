//! Discussions tab: list, selected conversation, composer and create modal.

pub mod cards;
pub mod composer;
pub mod flow;
pub mod modal;

pub use cards::{CardCatalog, CardImage};
pub use composer::Composer;
pub use flow::{
    selected_id, selection_location, Alignment, DiscussionFlow, DiscussionList, DiscussionPane,
    MessageBubble, SubmitOutcome,
};
pub use modal::NewDiscussionModal;
