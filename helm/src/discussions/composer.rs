use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use super::flow::SubmitOutcome;
use crate::api::dto::AddQuestionRequest;
use crate::error::{FieldErrors, HelmError, Result};
use crate::notify::Notifications;
use crate::query::{MutationState, Queries};

pub const ADD_MESSAGE_ERROR_TITLE: &str = "Error adding a new message";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ComposerForm {
    #[validate(custom(function = "crate::auth::forms::not_blank", message = "Text Required"))]
    pub text: String,
}

/// Input box under the messages of the selected discussion.
#[derive(Debug, Default)]
pub struct Composer {
    form: ComposerForm,
    field_errors: FieldErrors,
    mutation: MutationState<()>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.form.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.form.text
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field)
    }

    pub fn pending(&self) -> bool {
        self.mutation.is_pending()
    }

    /// Error of the last failed post, cleared by the next attempt.
    pub fn error(&self) -> Option<&HelmError> {
        self.mutation.error()
    }

    /// Disabled while the discussion is loading or a post is in flight.
    pub fn is_disabled(&self, details_loading: bool) -> bool {
        details_loading || self.mutation.is_pending()
    }

    pub fn begin_submit(
        &mut self,
        discussion_id: &str,
    ) -> std::result::Result<AddQuestionRequest, SubmitOutcome> {
        if self.mutation.is_pending() {
            return Err(SubmitOutcome::Busy);
        }
        if let Err(e) = self.form.validate() {
            let errors = FieldErrors::from(e);
            self.field_errors = errors.clone();
            return Err(SubmitOutcome::Invalid(errors));
        }

        self.field_errors = FieldErrors::new();
        self.mutation.start();
        Ok(AddQuestionRequest {
            discussion_id: discussion_id.to_string(),
            text: self.form.text.clone(),
        })
    }

    /// On success the input is cleared; on failure it is kept and a
    /// notification explains why.
    pub fn complete(&mut self, result: Result<()>, notifications: &mut Notifications) -> SubmitOutcome {
        self.mutation.finish(&result);
        match result {
            Ok(()) => {
                info!("Message added");
                self.form = ComposerForm::default();
                SubmitOutcome::Done
            }
            Err(e) => {
                warn!(error = %e, "Adding message failed");
                let message = e.user_message();
                notifications.error(ADD_MESSAGE_ERROR_TITLE, message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(
        &mut self,
        discussion_id: &str,
        queries: &Queries,
        notifications: &mut Notifications,
    ) -> SubmitOutcome {
        match self.begin_submit(discussion_id) {
            Ok(request) => {
                let result = queries.add_question(request).await;
                self.complete(result, notifications)
            }
            Err(outcome) => outcome,
        }
    }
}
