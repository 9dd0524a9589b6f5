use tracing::{info, warn};

use super::forms::{LoginForm, SignupForm};
use crate::api::dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::{FieldErrors, HelmError, Result};
use crate::notify::Notifications;
use crate::query::{MutationState, Queries};
use crate::router::{Location, DASHBOARD_PATH, LOGIN_PATH};
use crate::session::SessionStore;

/// What a submitted auth form asks the shell to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Navigate(Location),
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The request failed; the message is shown inline.
    Failed(String),
    /// A submission is already in flight.
    Busy,
}

#[derive(Debug, Default)]
pub struct LoginFlow {
    form: LoginForm,
    field_errors: FieldErrors,
    mutation: MutationState<LoginResponse>,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: LoginForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field)
    }

    pub fn submit_enabled(&self) -> bool {
        !self.mutation.is_pending()
    }

    pub fn loading(&self) -> bool {
        self.mutation.is_pending()
    }

    pub fn inline_error(&self) -> Option<String> {
        self.mutation.error_message()
    }

    /// Validate and mark the login pending. The returned body is what to send.
    pub fn begin_submit(&mut self) -> std::result::Result<LoginRequest, AuthOutcome> {
        if self.mutation.is_pending() {
            return Err(AuthOutcome::Busy);
        }
        match self.form.check() {
            Ok(request) => {
                self.field_errors = FieldErrors::new();
                self.mutation.start();
                Ok(request)
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                Err(AuthOutcome::Invalid(errors))
            }
        }
    }

    /// Apply the login response: persist the token and head to the dashboard,
    /// or keep the error inline.
    pub fn complete(&mut self, result: Result<LoginResponse>, session: &SessionStore) -> AuthOutcome {
        let result = result.and_then(|response| {
            session.set_token(response.token.clone())?;
            Ok(response)
        });
        self.mutation.finish(&result);

        match result {
            Ok(_) => {
                info!(email = %self.form.email, "Login succeeded");
                AuthOutcome::Navigate(Location::new(DASHBOARD_PATH))
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                AuthOutcome::Failed(e.user_message())
            }
        }
    }

    pub async fn submit(&mut self, queries: &Queries, session: &SessionStore) -> AuthOutcome {
        match self.begin_submit() {
            Ok(request) => {
                let result = queries.login(request).await;
                self.complete(result, session)
            }
            Err(outcome) => outcome,
        }
    }
}

#[derive(Debug, Default)]
pub struct SignupFlow {
    form: SignupForm,
    field_errors: FieldErrors,
    mutation: MutationState<()>,
}

impl SignupFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: SignupForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form_mut(&mut self) -> &mut SignupForm {
        &mut self.form
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field)
    }

    /// Inputs and the submit button are disabled while registering.
    pub fn submit_enabled(&self) -> bool {
        !self.mutation.is_pending()
    }

    pub fn loading(&self) -> bool {
        self.mutation.is_pending()
    }

    pub fn inline_error(&self) -> Option<String> {
        self.mutation.error_message()
    }

    pub fn begin_submit(&mut self) -> std::result::Result<RegisterRequest, AuthOutcome> {
        if self.mutation.is_pending() {
            return Err(AuthOutcome::Busy);
        }
        match self.form.check() {
            Ok(request) => {
                self.field_errors = FieldErrors::new();
                self.mutation.start();
                Ok(request)
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                Err(AuthOutcome::Invalid(errors))
            }
        }
    }

    pub fn complete(&mut self, result: Result<()>, notifications: &mut Notifications) -> AuthOutcome {
        self.mutation.finish(&result);
        match result {
            Ok(()) => {
                info!(email = %self.form.email, "Account created");
                notifications.info("Account created successfully!", "You can now Log in");
                AuthOutcome::Navigate(Location::new(LOGIN_PATH))
            }
            Err(e) => {
                warn!(error = %e, "Signup failed");
                AuthOutcome::Failed(e.user_message())
            }
        }
    }

    pub async fn submit(&mut self, queries: &Queries, notifications: &mut Notifications) -> AuthOutcome {
        match self.begin_submit() {
            Ok(request) => {
                let result = queries.register(request).await;
                self.complete(result, notifications)
            }
            Err(outcome) => outcome,
        }
    }
}
