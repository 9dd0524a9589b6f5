use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::{DiscussionsApi, GatewayClient, UsersApi};
use crate::auth::{AuthOutcome, LoginFlow, LoginForm, SignupFlow, SignupForm};
use crate::config::Config;
use crate::discussions::{
    selected_id, Composer, DiscussionFlow, DiscussionList, DiscussionPane, NewDiscussionModal,
    SubmitOutcome,
};
use crate::error::{FieldErrors, HelmError, Result};
use crate::feed::{FeedFlow, FeedSource, GeneratedFeed};
use crate::notify::Notifications;
use crate::query::{Queries, QueryCache};
use crate::router::{Location, Navigator, Route, RouterShell, Tab, LANDING_PATH, LOGIN_PATH};
use crate::session::{FileTokenStorage, SessionStore};

/// Shown in the navbar until the profile is known.
pub const FALLBACK_USER_NAME: &str = "User Name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navbar {
    pub user_name: String,
    pub links: Vec<NavLink>,
}

/// The whole client: session, backend access, routing and per-page state.
pub struct HelmApp {
    config: Config,
    session: Arc<SessionStore>,
    queries: Queries,
    navigator: Navigator,
    notifications: Notifications,
    discussions: DiscussionFlow,
    composer: Composer,
    modal: NewDiscussionModal,
    feed_source: Arc<dyn FeedSource>,
}

impl HelmApp {
    /// Build the app with the session persisted at `config.session.path`.
    pub fn new(config: Config) -> Result<Self> {
        let session = SessionStore::open(FileTokenStorage::new(&config.session.path))?;
        Self::with_session(config, session)
    }

    pub fn with_session(config: Config, session: Arc<SessionStore>) -> Result<Self> {
        let timeout = config.services.request_timeout_secs;
        let users = UsersApi::new(GatewayClient::new(
            &config.services.users_base_url,
            timeout,
            Arc::clone(&session),
        )?);
        let discussions = DiscussionsApi::new(GatewayClient::new(
            &config.services.discussions_base_url,
            timeout,
            Arc::clone(&session),
        )?);
        let queries = Queries::new(users, discussions, QueryCache::new(config.query.cache_size));
        let navigator = Navigator::new(
            RouterShell::new(Arc::clone(&session)),
            Location::new(LANDING_PATH),
        );
        let feed_source: Arc<dyn FeedSource> = Arc::new(GeneratedFeed::from_config(&config.feed));

        info!(
            users = %config.services.users_base_url,
            discussions = %config.services.discussions_base_url,
            authenticated = session.is_authenticated(),
            "Helm client ready"
        );

        Ok(Self {
            notifications: Notifications::new(config.notifications.ttl_secs),
            config,
            session,
            queries,
            navigator,
            discussions: DiscussionFlow::default(),
            composer: Composer::new(),
            modal: NewDiscussionModal::new(),
            feed_source,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn notifications(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn route(&self) -> Route {
        self.navigator.route()
    }

    pub fn location(&self) -> &Location {
        self.navigator.current()
    }

    pub fn navigate(&mut self, target: &str) -> Result<Route> {
        let location = Location::parse(target)?;
        Ok(self.navigator.push(location))
    }

    pub fn back(&mut self) -> Option<Route> {
        self.navigator.back()
    }

    pub async fn login(&mut self, form: LoginForm) -> AuthOutcome {
        let mut flow = LoginFlow::with_form(form);
        let outcome = flow.submit(&self.queries, &self.session).await;
        if let AuthOutcome::Navigate(target) = &outcome {
            // a new user must not see the previous one's cached data
            self.queries.reset();
            self.navigator.push(target.clone());
        }
        outcome
    }

    pub async fn signup(&mut self, form: SignupForm) -> AuthOutcome {
        let mut flow = SignupFlow::with_form(form);
        let outcome = flow.submit(&self.queries, &mut self.notifications).await;
        if let AuthOutcome::Navigate(target) = &outcome {
            self.navigator.push(target.clone());
        }
        outcome
    }

    /// Clear the session and cached data, then go back to the landing page.
    pub fn logout(&mut self) -> Result<Route> {
        self.session.clear()?;
        self.queries.reset();
        Ok(self.navigator.push(Location::new(LANDING_PATH)))
    }

    pub async fn navbar(&mut self) -> Navbar {
        let user_name = match self.queries.profile().await {
            Ok(profile) => profile.display_name(),
            Err(e) => {
                self.observe(&e);
                FALLBACK_USER_NAME.to_string()
            }
        };
        let active = match self.route() {
            Route::Dashboard(tab) => Some(tab),
            _ => None,
        };
        let links = Tab::ALL
            .iter()
            .map(|tab| NavLink {
                label: tab.label(),
                path: tab.path(),
                active: active == Some(*tab),
            })
            .collect();
        Navbar { user_name, links }
    }

    pub async fn discussion_list(&mut self) -> Result<DiscussionList> {
        let location = self.navigator.current().clone();
        let result = self.discussions.list(&self.queries, &location).await;
        self.checked(result)
    }

    pub async fn discussion_pane(&mut self) -> Result<DiscussionPane> {
        let location = self.navigator.current().clone();
        let result = self.discussions.pane(&self.queries, &location).await;
        self.checked(result)
    }

    pub fn select_discussion(&mut self, discussion_id: i64) -> Route {
        self.discussions.select(&mut self.navigator, discussion_id)
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_disabled(&self) -> bool {
        let loading = selected_id(self.navigator.current())
            .is_some_and(|id| self.discussions.details_loading(&self.queries, id));
        self.composer.is_disabled(loading)
    }

    /// Post a message to the selected discussion.
    pub async fn send_message(&mut self, text: impl Into<String>) -> SubmitOutcome {
        let Some(discussion_id) = selected_id(self.navigator.current()).map(str::to_string) else {
            let mut errors = FieldErrors::new();
            errors.insert("discussion_id", "No discussion selected");
            return SubmitOutcome::Invalid(errors);
        };

        self.composer.set_text(text);
        let outcome = self
            .composer
            .submit(&discussion_id, &self.queries, &mut self.notifications)
            .await;
        if let (SubmitOutcome::Failed(_), Some(e)) = (&outcome, self.composer.error().cloned()) {
            self.observe(&e);
        }
        outcome
    }

    pub fn modal(&mut self) -> &mut NewDiscussionModal {
        &mut self.modal
    }

    pub async fn create_discussion(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> SubmitOutcome {
        self.modal.open();
        self.modal.form_mut().name = name.into();
        self.modal.form_mut().text = text.into();

        let outcome = self
            .modal
            .submit(&self.queries, &mut self.notifications)
            .await;
        if let (SubmitOutcome::Failed(_), Some(e)) = (&outcome, self.modal.error().cloned()) {
            self.observe(&e);
        }
        outcome
    }

    /// A fresh feed over the configured source.
    pub fn feed(&self) -> FeedFlow {
        FeedFlow::new(Arc::clone(&self.feed_source), &self.config.feed)
    }

    fn checked<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.observe(e);
        }
        result
    }

    /// A 401 drops the session and sends the user to login, when enabled.
    fn observe(&mut self, error: &HelmError) {
        if !error.is_unauthorized() || !self.config.services.logout_on_unauthorized {
            return;
        }
        warn!("Session rejected by the server, logging out");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear rejected session");
        }
        self.queries.reset();
        self.navigator.replace(Location::new(LOGIN_PATH));
    }
}

impl std::fmt::Debug for HelmApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelmApp")
            .field("session", &self.session)
            .field("location", self.navigator.current())
            .field("route", &self.navigator.route())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_app() -> HelmApp {
        HelmApp::with_session(Config::for_base_url("http://127.0.0.1:9"), SessionStore::in_memory())
            .unwrap()
    }

    #[test]
    fn test_starts_on_landing() {
        let app = offline_app();
        assert_eq!(app.route(), Route::Landing);
    }

    #[test]
    fn test_guarded_navigation_without_session() {
        let mut app = offline_app();
        assert_eq!(app.navigate("/main/feed").unwrap(), Route::Login);
        assert_eq!(app.location().path(), "/login");
    }

    #[test]
    fn test_logout_returns_to_landing() {
        let mut app = offline_app();
        app.session().set_token("t1").unwrap();
        assert_eq!(app.navigate("/main").unwrap(), Route::Dashboard(Tab::Discussions));

        assert_eq!(app.logout().unwrap(), Route::Landing);
        assert!(!app.session().is_authenticated());
        assert_eq!(app.navigate("/main").unwrap(), Route::Login);
    }

    #[tokio::test]
    async fn test_send_message_requires_selection() {
        let mut app = offline_app();
        let outcome = app.send_message("hello").await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    }
}
