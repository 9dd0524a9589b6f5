use super::location::Location;

/// Dashboard sections reachable from the navbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Discussions,
    Feed,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Discussions, Tab::Feed];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Discussions => "Discussions",
            Tab::Feed => "Feed",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Tab::Discussions => "/main/discussions",
            Tab::Feed => "/main/feed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Signup,
    Dashboard(Tab),
    NotFound,
}

pub const LANDING_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const DASHBOARD_PATH: &str = "/main";

impl Route {
    pub fn matches(location: &Location) -> Route {
        let path = location.path();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match path {
            LANDING_PATH => Route::Landing,
            LOGIN_PATH => Route::Login,
            SIGNUP_PATH => Route::Signup,
            DASHBOARD_PATH | "/main/discussions" => Route::Dashboard(Tab::Discussions),
            "/main/feed" => Route::Dashboard(Tab::Feed),
            _ => Route::NotFound,
        }
    }

    /// Paths under `/main` require a session, known or not.
    pub fn is_guarded_path(path: &str) -> bool {
        path == DASHBOARD_PATH || path.starts_with("/main/")
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Helm",
            Route::Login => "Welcome back! Helm",
            Route::Signup => "Hello!",
            Route::Dashboard(tab) => tab.label(),
            Route::NotFound => "404 Page Not Found",
        }
    }
}
