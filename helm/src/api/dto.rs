//! Wire types for the users and discussions services.
//!
//! Field names serialize as camelCase to match the services' JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Comma-joined card names drawn for this discussion.
    #[serde(default)]
    pub cards: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionsResponse {
    #[serde(default)]
    pub data: Vec<Discussion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub from_user: bool,
    #[serde(default)]
    pub discussion_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionDetails {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub cards: Option<String>,
}

impl DiscussionDetails {
    /// Card names in draw order. Blank segments are dropped.
    pub fn card_names(&self) -> Vec<&str> {
        self.cards
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDiscussionRequest {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionRequest {
    pub discussion_id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_uses_camel_case() {
        let body = RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
    }

    #[test]
    fn test_discussion_details_card_names() {
        let details: DiscussionDetails = serde_json::from_str(
            r#"{"questions":[{"id":1,"text":"hi","fromUser":true,"discussionId":3}],"cards":"Sun, Moon,"}"#,
        )
        .unwrap();
        assert_eq!(details.card_names(), vec!["Sun", "Moon"]);
        assert!(details.questions[0].from_user);
    }

    #[test]
    fn test_discussion_details_null_cards() {
        let details: DiscussionDetails =
            serde_json::from_str(r#"{"questions":[],"cards":null}"#).unwrap();
        assert!(details.card_names().is_empty());
    }

    #[test]
    fn test_add_question_request_wire_name() {
        let body = AddQuestionRequest {
            discussion_id: "7".into(),
            text: "and tomorrow?".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["discussionId"], "7");
    }

    #[test]
    fn test_profile_display_name() {
        let profile = UserProfile {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: None,
        };
        assert_eq!(profile.display_name(), "Ada Lovelace");
    }
}
