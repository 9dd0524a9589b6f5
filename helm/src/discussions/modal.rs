use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use super::flow::SubmitOutcome;
use crate::api::dto::CreateDiscussionRequest;
use crate::error::{FieldErrors, HelmError, Result};
use crate::notify::Notifications;
use crate::query::{MutationState, Queries};

pub const MODAL_TITLE: &str = "Create New Discussion";
pub const CREATE_DISCUSSION_ERROR_TITLE: &str = "Error creating a new discussion";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewDiscussionForm {
    #[validate(custom(function = "crate::auth::forms::not_blank", message = "Name Required"))]
    pub name: String,
    #[validate(custom(function = "crate::auth::forms::not_blank", message = "Text Required"))]
    pub text: String,
}

#[derive(Debug, Default)]
pub struct NewDiscussionModal {
    open: bool,
    form: NewDiscussionForm,
    field_errors: FieldErrors,
    mutation: MutationState<()>,
}

impl NewDiscussionModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Refused while the create request is pending. Closing discards the form.
    pub fn close(&mut self) -> bool {
        if self.mutation.is_pending() {
            debug!("Close ignored while discussion is being created");
            return false;
        }
        self.open = false;
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.form = NewDiscussionForm::default();
        self.field_errors = FieldErrors::new();
        self.mutation.reset();
    }

    pub fn form_mut(&mut self) -> &mut NewDiscussionForm {
        &mut self.form
    }

    pub fn form(&self) -> &NewDiscussionForm {
        &self.form
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field)
    }

    pub fn pending(&self) -> bool {
        self.mutation.is_pending()
    }

    pub fn error(&self) -> Option<&HelmError> {
        self.mutation.error()
    }

    pub fn begin_submit(&mut self) -> std::result::Result<CreateDiscussionRequest, SubmitOutcome> {
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
        Ok(CreateDiscussionRequest {
            name: self.form.name.trim().to_string(),
            text: self.form.text.clone(),
        })
    }

    pub fn complete(&mut self, result: Result<()>, notifications: &mut Notifications) -> SubmitOutcome {
        self.mutation.finish(&result);
        match result {
            Ok(()) => {
                info!(name = %self.form.name, "Discussion created");
                self.open = false;
                self.reset();
                SubmitOutcome::Done
            }
            Err(e) => {
                warn!(error = %e, "Creating discussion failed");
                let message = e.user_message();
                notifications.error(CREATE_DISCUSSION_ERROR_TITLE, message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(&mut self, queries: &Queries, notifications: &mut Notifications) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(request) => {
                let result = queries.create_discussion(request).await;
                self.complete(result, notifications)
            }
            Err(outcome) => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HelmError;

    fn filled() -> NewDiscussionModal {
        let mut modal = NewDiscussionModal::new();
        modal.open();
        modal.form_mut().name = "Career".into();
        modal.form_mut().text = "Should I switch jobs?".into();
        modal
    }

    #[test]
    fn test_both_fields_required() {
        let mut modal = NewDiscussionModal::new();
        modal.open();

        assert!(matches!(
            modal.begin_submit().unwrap_err(),
            SubmitOutcome::Invalid(_)
        ));
        assert_eq!(modal.field_error("name"), Some("Name Required"));
        assert_eq!(modal.field_error("text"), Some("Text Required"));
    }

    #[test]
    fn test_close_refused_while_pending() {
        let mut modal = filled();
        modal.begin_submit().unwrap();

        assert!(!modal.close());
        assert!(modal.is_open());
    }

    #[test]
    fn test_success_closes_and_resets() {
        let mut notifications = Notifications::default();
        let mut modal = filled();
        modal.begin_submit().unwrap();

        assert_eq!(modal.complete(Ok(()), &mut notifications), SubmitOutcome::Done);
        assert!(!modal.is_open());
        assert_eq!(modal.form(), &NewDiscussionForm::default());
    }

    #[test]
    fn test_failure_stays_open() {
        let mut notifications = Notifications::default();
        let mut modal = filled();
        modal.begin_submit().unwrap();

        let outcome = modal.complete(
            Err(HelmError::Api {
                status: 500,
                message: "boom".into(),
            }),
            &mut notifications,
        );

        assert_eq!(outcome, SubmitOutcome::Failed("boom".into()));
        assert!(modal.is_open());
        assert_eq!(modal.form().name, "Career");
        assert_eq!(
            notifications.latest().unwrap().title,
            "Error creating a new discussion"
        );
        assert!(modal.close());
    }
}
