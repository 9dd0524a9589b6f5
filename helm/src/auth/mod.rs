//! Login and signup: validated forms submitted through the query layer.

pub mod flow;
pub mod forms;

pub use flow::{AuthOutcome, LoginFlow, SignupFlow};
pub use forms::{LoginForm, SignupForm};
