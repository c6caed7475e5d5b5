use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay};

/// Backend-assigned key tying a finished detection to later chat questions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From)]
#[serde(transparent)]
pub struct DetectionId(pub i64);

/// One recognized object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Detection {
    pub class: String,
    /// Percentage string as sent by the backend, e.g. `"87%"`.
    pub confidence: String,
    #[serde(rename = "box", default)]
    pub bbox: Vec<f64>,
}

impl Detection {
    /// Comma-joined coordinates, the form used both for display and ordering.
    pub fn box_label(&self) -> String {
        self.bbox
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, StrumDisplay, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Ai, content: content.into() }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{} {}", first, last)
            }
            _ => self.username.clone(),
        }
    }

    pub fn initials(&self) -> String {
        let name = self.display_name();
        let parts: Vec<&str> = name.split(' ').filter(|p| !p.is_empty()).collect();
        if parts.len() >= 2 {
            parts[..2]
                .iter()
                .filter_map(|p| p.chars().next())
                .collect::<String>()
                .to_uppercase()
        } else {
            name.chars().take(2).collect::<String>().to_uppercase()
        }
    }
}

// Wire payloads

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DetectResponse {
    pub id: DetectionId,
    pub annotated_image: String,
    #[serde(default)]
    pub detection_results: Vec<Detection>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub image_id: DetectionId,
    pub question: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Error body the backend returns alongside 4xx/5xx statuses.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>) -> UserProfile {
        UserProfile {
            id: Some(1),
            username: "jdoe".into(),
            email: "j@doe.io".into(),
            first_name: first.map(Into::into),
            last_name: last.map(Into::into),
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        assert_eq!(profile(Some("Jane"), Some("Doe")).display_name(), "Jane Doe");
        assert_eq!(profile(Some("Jane"), None).display_name(), "jdoe");
        assert_eq!(profile(Some("Jane"), Some("")).display_name(), "jdoe");
    }

    #[test]
    fn initials_from_two_words_or_prefix() {
        assert_eq!(profile(Some("jane"), Some("doe")).initials(), "JD");
        assert_eq!(profile(None, None).initials(), "JD");
    }

    #[test]
    fn detect_response_reads_backend_field_names() {
        let body = r#"{
            "id": 42,
            "image": "/media/uploads/a.jpg",
            "annotated_image": "/media/annotated/annotated_42.jpg",
            "detection_results": [{"class": "cat", "confidence": "92%", "box": [1, 2, 3, 4]}],
            "uploaded_at": "2024-01-01T00:00:00Z"
        }"#;
        let parsed: DetectResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id, DetectionId(42));
        assert_eq!(parsed.detection_results[0].class, "cat");
        assert_eq!(parsed.detection_results[0].box_label(), "1,2,3,4");
    }

    #[test]
    fn chat_request_uses_image_id_key() {
        let req = ChatRequest { image_id: DetectionId(7), question: "why?".into() };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["image_id"], 7);
        assert_eq!(json["question"], "why?");
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(ChatRole::Ai.to_string(), "ai");
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
    }
}
