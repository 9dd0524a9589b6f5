use tracing::debug;

use super::location::Location;
use super::route::Route;
use super::shell::{Resolution, RouterShell};

/// Bound on chained redirects; the guard only ever redirects once.
const MAX_REDIRECTS: usize = 4;

/// History stack of visited locations, resolved through the shell.
#[derive(Debug, Clone)]
pub struct Navigator {
    shell: RouterShell,
    history: Vec<Location>,
    route: Route,
}

impl Navigator {
    pub fn new(shell: RouterShell, initial: Location) -> Self {
        let mut navigator = Self {
            shell,
            history: vec![Location::default()],
            route: Route::NotFound,
        };
        navigator.replace(initial);
        navigator
    }

    pub fn current(&self) -> &Location {
        // history is never empty
        &self.history[self.history.len() - 1]
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn push(&mut self, target: Location) -> Route {
        debug!(to = %target, "Navigate");
        self.history.push(target);
        self.settle()
    }

    pub fn replace(&mut self, target: Location) -> Route {
        if let Some(last) = self.history.last_mut() {
            *last = target;
        }
        self.settle()
    }

    /// Pop one entry. Returns `None` at the start of history.
    pub fn back(&mut self) -> Option<Route> {
        if self.history.len() <= 1 {
            return None;
        }
        self.history.pop();
        Some(self.settle())
    }

    /// Re-run the guard for the current location, e.g. after the session changed.
    pub fn refresh(&mut self) -> Route {
        self.settle()
    }

    fn settle(&mut self) -> Route {
        for _ in 0..MAX_REDIRECTS {
            match self.shell.resolve(self.current()) {
                Resolution::Render(route) => {
                    self.route = route;
                    return route;
                }
                Resolution::Redirect(target) => {
                    debug!(from = %self.current(), to = %target, "Redirect");
                    if let Some(last) = self.history.last_mut() {
                        *last = target;
                    }
                }
            }
        }
        self.route = Route::NotFound;
        self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::route::Tab;
    use crate::session::SessionStore;

    #[test]
    fn test_redirect_replaces_guarded_entry() {
        let session = SessionStore::in_memory();
        let mut nav = Navigator::new(RouterShell::new(session), Location::new("/"));

        let route = nav.push(Location::new("/main/feed"));
        assert_eq!(route, Route::Login);
        assert_eq!(nav.current().path(), "/login");
        assert_eq!(nav.depth(), 2);
    }

    #[test]
    fn test_back_walks_history() {
        let session = SessionStore::in_memory();
        session.set_token("t").unwrap();
        let mut nav = Navigator::new(RouterShell::new(session), Location::new("/main"));

        nav.push(Location::new("/main/discussions").with_query("discussionId", "3"));
        nav.push(Location::new("/main/feed"));

        assert_eq!(nav.back(), Some(Route::Dashboard(Tab::Discussions)));
        assert_eq!(nav.current().query("discussionId"), Some("3"));
        assert_eq!(nav.back(), Some(Route::Dashboard(Tab::Discussions)));
        assert_eq!(nav.current().query("discussionId"), None);
        assert_eq!(nav.back(), None);
    }

    #[test]
    fn test_refresh_after_logout_redirects() {
        let session = SessionStore::in_memory();
        session.set_token("t").unwrap();
        let mut nav = Navigator::new(RouterShell::new(session.clone()), Location::new("/main"));
        assert_eq!(nav.route(), Route::Dashboard(Tab::Discussions));

        session.clear().unwrap();
        assert_eq!(nav.refresh(), Route::Login);
    }
}
