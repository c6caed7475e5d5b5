use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use shared::pipeline::{ChatBackend, DetectionBackend};
use shared::{
    ApiConfig, AuthResponse, ChatRequest, ChatResponse, ClientError, DetectResponse, DetectionId,
    ErrorBody, LoginRequest, RegisterRequest, Ticket, UserProfile,
};

use crate::StagedFile;

/// HTTP client for the machine API. Attaches the stored credential to every
/// authenticated call.
#[derive(Clone, Debug, PartialEq)]
pub struct MachineClient {
    config: ApiConfig,
    token: Option<String>,
}

impl MachineClient {
    pub fn new(config: ApiConfig, token: Option<String>) -> Self {
        Self { config, token }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn with_token(&self, token: Option<String>) -> Self {
        Self { config: self.config.clone(), token }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Token {}", token)),
            None => builder,
        }
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let request = Request::post(&self.config.endpoint("login/"))
            .json(body)
            .map_err(|e| ClientError::Request(format!("Failed to build request: {}", e)))?;
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Request(format!("Network error: {}", e)))?;
        if !response.ok() {
            return Err(ClientError::Request(error_message(response).await));
        }
        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| ClientError::Request(format!("Failed to parse response: {}", e)))
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<(), ClientError> {
        let request = Request::post(&self.config.endpoint("register/"))
            .json(body)
            .map_err(|e| ClientError::Request(format!("Failed to build request: {}", e)))?;
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Request(format!("Network error: {}", e)))?;
        if response.ok() {
            Ok(())
        } else {
            Err(ClientError::Request(error_message(response).await))
        }
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let response = self
            .authorized(Request::get(&self.config.endpoint("me/")))
            .send()
            .await
            .map_err(|e| ClientError::Request(format!("Network error: {}", e)))?;
        if is_auth_status(response.status()) {
            return Err(ClientError::AuthRequired);
        }
        if !response.ok() {
            return Err(ClientError::Request(error_message(response).await));
        }
        response
            .json::<UserProfile>()
            .await
            .map_err(|e| ClientError::Request(format!("Failed to parse user info: {}", e)))
    }
}

#[async_trait(?Send)]
impl DetectionBackend<StagedFile> for MachineClient {
    async fn detect(&self, image: &StagedFile, ticket: Ticket) -> Result<DetectResponse, ClientError> {
        let form_data = web_sys::FormData::new()
            .map_err(|e| ClientError::DetectionFailure(format!("{:?}", e)))?;
        form_data
            .append_with_blob_and_filename("image", image.file.as_ref(), &image.file.name())
            .map_err(|e| ClientError::DetectionFailure(format!("{:?}", e)))?;

        let request = self
            .authorized(Request::post(&self.config.endpoint("detect/")))
            .header("X-Request-Id", &ticket.request_id().to_string())
            .body(form_data)
            .map_err(|e| ClientError::DetectionFailure(format!("Failed to build request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::DetectionFailure(format!("Network error: {}", e)))?;
        if is_auth_status(response.status()) {
            return Err(ClientError::AuthRequired);
        }
        if !response.ok() {
            return Err(ClientError::DetectionFailure(error_message(response).await));
        }
        response
            .json::<DetectResponse>()
            .await
            .map_err(|e| ClientError::DetectionFailure(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait(?Send)]
impl ChatBackend for MachineClient {
    async fn ask(
        &self,
        detection_id: DetectionId,
        question: &str,
        ticket: Ticket,
    ) -> Result<ChatResponse, ClientError> {
        let body = ChatRequest { image_id: detection_id, question: question.to_string() };
        let request = self
            .authorized(Request::post(&self.config.endpoint("chat/")))
            .header("X-Request-Id", &ticket.request_id().to_string())
            .json(&body)
            .map_err(|e| ClientError::ChatFailure(format!("Failed to build request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::ChatFailure(format!("Network error: {}", e)))?;
        if is_auth_status(response.status()) {
            return Err(ClientError::AuthRequired);
        }
        if !response.ok() {
            return Err(ClientError::ChatFailure(error_message(response).await));
        }
        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ClientError::ChatFailure(format!("Failed to parse response: {}", e)))
    }
}

fn is_auth_status(status: u16) -> bool {
    status == 401 || status == 403
}

/// Prefers the backend's `{"error": ...}` text, falls back to status and raw body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error: Some(message) }) => message,
        _ => format!("Server error: {} - {}", status, body),
    }
}
