pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod sort;
pub mod upload;

pub use config::ApiConfig;
pub use error::{ClientError, SessionError};
pub use models::{
    AuthResponse, ChatMessage, ChatRequest, ChatResponse, ChatRole, DetectResponse, Detection,
    DetectionId, ErrorBody, LoginRequest, RegisterRequest, UserProfile,
};
pub use session::{ChatStatus, DetectionSession, SessionStatus, SessionStore, Ticket};
pub use sort::{SortDirection, SortKey, SortState};
