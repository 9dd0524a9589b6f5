use std::sync::Arc;

use tracing::debug;

use super::location::Location;
use super::route::{Route, LOGIN_PATH};
use crate::session::SessionStore;

/// What the shell decided to show for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Location),
}

/// Route table plus the session guard over `/main`.
#[derive(Debug, Clone)]
pub struct RouterShell {
    session: Arc<SessionStore>,
}

impl RouterShell {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn resolve(&self, location: &Location) -> Resolution {
        if Route::is_guarded_path(location.path()) && !self.session.is_authenticated() {
            debug!(path = location.path(), "Guard redirect: no session");
            return Resolution::Redirect(Location::new(LOGIN_PATH));
        }
        Resolution::Render(Route::matches(location))
    }
}
