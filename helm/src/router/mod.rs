//! Routing shell: path table, session guard over `/main`, and history.

pub mod location;
pub mod navigator;
pub mod route;
pub mod shell;

pub use location::Location;
pub use navigator::Navigator;
pub use route::{Route, Tab, DASHBOARD_PATH, LANDING_PATH, LOGIN_PATH, SIGNUP_PATH};
pub use shell::{Resolution, RouterShell};
