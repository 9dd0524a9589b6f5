use super::key::QueryKey;
use crate::error::HelmError;

/// Identity of a write operation, carrying the parameters that decide which
/// reads it affects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationKey {
    Login,
    Register,
    AddDiscussion,
    AddQuestion { discussion_id: String },
}

impl MutationKey {
    pub fn name(&self) -> &'static str {
        match self {
            MutationKey::Login => "LOGIN",
            MutationKey::Register => "REGISTER",
            MutationKey::AddDiscussion => "ADD_DISCUSSION",
            MutationKey::AddQuestion { .. } => "ADD_QUESTION",
        }
    }

    /// Queries whose result set changes when this mutation succeeds.
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            MutationKey::Login | MutationKey::Register => Vec::new(),
            MutationKey::AddDiscussion => vec![QueryKey::Discussions],
            MutationKey::AddQuestion { discussion_id } => {
                vec![QueryKey::details(discussion_id.clone())]
            }
        }
    }
}

/// Lifecycle of one mutation as seen by the form that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationState<T> {
    Idle,
    Pending,
    Error(HelmError),
    Success(T),
}

impl<T> Default for MutationState<T> {
    fn default() -> Self {
        MutationState::Idle
    }
}

impl<T> MutationState<T> {
    pub fn start(&mut self) {
        *self = MutationState::Pending;
    }

    pub fn finish(&mut self, result: &crate::error::Result<T>)
    where
        T: Clone,
    {
        *self = match result {
            Ok(value) => MutationState::Success(value.clone()),
            Err(e) => MutationState::Error(e.clone()),
        };
    }

    pub fn reset(&mut self) {
        *self = MutationState::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, MutationState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MutationState::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MutationState::Success(_))
    }

    pub fn error(&self) -> Option<&HelmError> {
        match self {
            MutationState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(HelmError::user_message)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            MutationState::Success(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_discussion_invalidates_list_only() {
        assert_eq!(
            MutationKey::AddDiscussion.invalidates(),
            vec![QueryKey::Discussions]
        );
    }

    #[test]
    fn test_add_question_invalidates_its_discussion_only() {
        let key = MutationKey::AddQuestion {
            discussion_id: "42".to_string(),
        };
        assert_eq!(key.invalidates(), vec![QueryKey::details("42")]);
    }

    #[test]
    fn test_auth_mutations_invalidate_nothing() {
        assert!(MutationKey::Login.invalidates().is_empty());
        assert!(MutationKey::Register.invalidates().is_empty());
    }

    #[test]
    fn test_state_transitions() {
        let mut state: MutationState<u8> = MutationState::default();
        assert!(state.is_idle());

        state.start();
        assert!(state.is_pending());

        state.finish(&Err(HelmError::Transport("down".into())));
        assert!(state.is_error());
        assert_eq!(state.error_message().as_deref(), Some("Network error: down"));

        state.start();
        state.finish(&Ok(7));
        assert_eq!(state.data(), Some(&7));
        assert!(!state.is_pending());
    }
}
