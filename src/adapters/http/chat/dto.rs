//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types. The wire format is
//! camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::application::{InitializeSessionResult, SendMessageResult};
use crate::domain::chat::{ChatMessage, ChatSession, Priority, SenderRole, SupportType, UserProfile};
use crate::domain::crisis::CrisisResource;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to open a chat session. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitChatRequest {
    #[serde(default)]
    pub user_info: Option<UserInfoDto>,
}

/// Intake details as sent by the client.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub support_type: Option<SupportType>,
}

impl From<UserInfoDto> for UserProfile {
    fn from(dto: UserInfoDto) -> Self {
        UserProfile::new(dto.name, dto.mood, dto.support_type)
    }
}

impl From<&UserProfile> for UserInfoDto {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            mood: profile.mood.clone(),
            support_type: profile.support_type,
        }
    }
}

/// Request carrying one user message.
///
/// Fields are optional so that a missing field is a validation error
/// rather than a JSON error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A message as rendered to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub sender: SenderRole,
    pub text: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggested_replies: Vec<String>,
}

impl From<&ChatMessage> for MessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id().to_string(),
            sender: message.sender(),
            text: message.text().to_string(),
            timestamp: message.timestamp().as_datetime().to_rfc3339(),
            priority: message.priority(),
            suggested_replies: message.suggested_replies().to_vec(),
        }
    }
}

fn render(messages: &[ChatMessage]) -> Vec<MessageResponse> {
    messages.iter().map(MessageResponse::from).collect()
}

/// Response for `POST /api/chat/init`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitChatResponse {
    pub session_id: String,
    pub messages: Vec<MessageResponse>,
    pub requires_crisis_panel: bool,
    pub quick_replies: Vec<String>,
}

impl From<InitializeSessionResult> for InitChatResponse {
    fn from(result: InitializeSessionResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            messages: render(&result.messages),
            requires_crisis_panel: result.requires_crisis_panel,
            quick_replies: result.quick_replies,
        }
    }
}

/// Response for `POST /api/chat/message`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub messages: Vec<MessageResponse>,
    pub requires_crisis_panel: bool,
    pub quick_replies: Vec<String>,
}

impl From<SendMessageResult> for SendMessageResponse {
    fn from(result: SendMessageResult) -> Self {
        Self {
            messages: render(&result.messages),
            requires_crisis_panel: result.requires_crisis_panel,
            quick_replies: result.quick_replies,
        }
    }
}

/// Full session transcript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub user_info: UserInfoDto,
    pub messages: Vec<MessageResponse>,
    pub created_at: String,
    pub last_activity: String,
}

/// Response for `GET /api/chat/:sessionId`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session: SessionView,
}

impl From<&ChatSession> for SessionResponse {
    fn from(session: &ChatSession) -> Self {
        Self {
            session: SessionView {
                id: session.id().to_string(),
                user_info: UserInfoDto::from(session.profile()),
                messages: render(session.messages()),
                created_at: session.created_at().as_datetime().to_rfc3339(),
                last_activity: session.last_activity().as_datetime().to_rfc3339(),
            },
        }
    }
}

/// Response for `GET /api/chat/crisis/resources`.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisResourcesResponse {
    pub resources: &'static [CrisisResource],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_request_accepts_empty_object() {
        let req: InitChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_info.is_none());
    }

    #[test]
    fn init_request_reads_camel_case_fields() {
        let req: InitChatRequest = serde_json::from_str(
            r#"{"userInfo":{"name":"Ana","mood":"anxious","supportType":"crisis"}}"#,
        )
        .unwrap();
        let profile: UserProfile = req.user_info.unwrap().into();
        assert_eq!(profile.name(), Some("Ana"));
        assert!(profile.is_in_crisis());
    }

    #[test]
    fn unknown_support_type_is_unspecified() {
        let info: UserInfoDto = serde_json::from_str(r#"{"supportType":"other"}"#).unwrap();
        assert_eq!(info.support_type, Some(SupportType::Unspecified));
    }

    #[test]
    fn message_response_omits_empty_optionals() {
        let json = serde_json::to_value(MessageResponse::from(&ChatMessage::user("hi"))).unwrap();
        assert_eq!(json["sender"], "user");
        assert!(json.get("priority").is_none());
        assert!(json.get("suggestedReplies").is_none());
    }

    #[test]
    fn assistant_messages_render_as_bot() {
        let message = ChatMessage::assistant("hello")
            .with_priority(Priority::Critical)
            .with_suggested_replies(["a", "b"]);
        let json = serde_json::to_value(MessageResponse::from(&message)).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["priority"], "critical");
        assert_eq!(json["suggestedReplies"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn session_response_uses_camel_case() {
        let session = ChatSession::new(UserProfile::default());
        let json = serde_json::to_value(SessionResponse::from(&session)).unwrap();
        assert!(json["session"].get("lastActivity").is_some());
        assert!(json["session"].get("userInfo").is_some());
    }
}
