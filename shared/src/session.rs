//! Detection-session state machine.
//!
//! [`SessionStore`] is the single writer of the current [`DetectionSession`].
//! The UI reads the snapshot and forwards user events to the transition
//! methods; async request tasks hand their results back through the same
//! methods together with the [`Ticket`] they were issued.

use crate::error::{ClientError, SessionError};
use crate::models::{ChatMessage, Detection, DetectResponse, DetectionId};
use strum_macros::Display;
use uuid::Uuid;

/// Transcript entry appended when a chat request fails.
pub const CHAT_FALLBACK_MESSAGE: &str = "Error getting response.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum SessionStatus {
    Empty,
    Staged,
    Detecting,
    Ready,
    DetectionFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ChatStatus {
    Idle,
    AwaitingAnswer,
}

/// Issued when a request is dispatched, checked when its response is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request_id: Uuid,
}

impl Ticket {
    fn new(generation: u64) -> Self {
        Self { generation, request_id: Uuid::new_v4() }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

/// Everything a successful `/detect/` call contributes to the session.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResult {
    pub id: DetectionId,
    pub annotated_image: String,
    pub detections: Vec<Detection>,
}

impl From<DetectResponse> for DetectionResult {
    fn from(response: DetectResponse) -> Self {
        Self {
            id: response.id,
            annotated_image: response.annotated_image,
            detections: response.detection_results,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DetectionJob<I> {
    pub ticket: Ticket,
    pub image: I,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatJob {
    pub ticket: Ticket,
    pub detection_id: DetectionId,
    pub question: String,
}

#[derive(Clone, Debug)]
pub struct DetectionSession<I> {
    image: Option<I>,
    result: Option<DetectionResult>,
    transcript: Vec<ChatMessage>,
    status: SessionStatus,
    chat_status: ChatStatus,
    last_error: Option<String>,
}

impl<I> DetectionSession<I> {
    fn empty() -> Self {
        Self {
            image: None,
            result: None,
            transcript: Vec::new(),
            status: SessionStatus::Empty,
            chat_status: ChatStatus::Idle,
            last_error: None,
        }
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn chat_status(&self) -> ChatStatus {
        self.chat_status
    }

    pub fn detection_id(&self) -> Option<DetectionId> {
        self.result.as_ref().map(|r| r.id)
    }

    pub fn annotated_image(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.annotated_image.as_str())
    }

    pub fn detections(&self) -> &[Detection] {
        self.result
            .as_ref()
            .map(|r| r.detections.as_slice())
            .unwrap_or(&[])
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_detecting(&self) -> bool {
        self.status == SessionStatus::Detecting
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.chat_status == ChatStatus::AwaitingAnswer
    }

    pub fn can_detect(&self) -> bool {
        matches!(self.status, SessionStatus::Staged | SessionStatus::DetectionFailed)
    }

    pub fn can_ask(&self) -> bool {
        self.status == SessionStatus::Ready
            && self.result.is_some()
            && self.chat_status == ChatStatus::Idle
    }
}

pub struct SessionStore<I> {
    generation: u64,
    session: DetectionSession<I>,
}

impl<I> Default for SessionStore<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> SessionStore<I> {
    pub fn new() -> Self {
        Self { generation: 0, session: DetectionSession::empty() }
    }

    pub fn session(&self) -> &DetectionSession<I> {
        &self.session
    }

    pub fn stage_image(&mut self, image: I) -> Result<(), SessionError> {
        if self.session.is_detecting() {
            return Err(SessionError::Busy);
        }
        self.generation += 1;
        self.session = DetectionSession::empty();
        self.session.image = Some(image);
        self.session.status = SessionStatus::Staged;
        log::debug!("session {}: image staged", self.generation);
        Ok(())
    }

    /// Drops the staged image and everything derived from it. Always accepted,
    /// so it also abandons a request that never comes back.
    pub fn clear_image(&mut self) {
        self.generation += 1;
        if self.session.is_detecting() || self.session.is_awaiting_answer() {
            log::info!("session {}: cleared with a request outstanding", self.generation);
        }
        self.session = DetectionSession::empty();
    }

    pub fn begin_detection(&mut self) -> Result<DetectionJob<I>, SessionError>
    where
        I: Clone,
    {
        let image = match self.session.status {
            SessionStatus::Staged | SessionStatus::DetectionFailed => self
                .session
                .image
                .clone()
                .ok_or(SessionError::NoImage)?,
            SessionStatus::Detecting => return Err(SessionError::Busy),
            SessionStatus::Ready => return Err(SessionError::AlreadyDetected),
            SessionStatus::Empty => return Err(SessionError::NoImage),
        };
        self.session.status = SessionStatus::Detecting;
        self.session.last_error = None;
        let ticket = Ticket::new(self.generation);
        log::debug!("session {}: detection {} dispatched", self.generation, ticket.request_id);
        Ok(DetectionJob { ticket, image })
    }

    pub fn resolve_detection(
        &mut self,
        ticket: Ticket,
        result: DetectionResult,
    ) -> Result<(), SessionError> {
        self.check_detection_ticket(ticket)?;
        self.session.result = Some(result);
        self.session.transcript.clear();
        self.session.chat_status = ChatStatus::Idle;
        self.session.status = SessionStatus::Ready;
        Ok(())
    }

    pub fn fail_detection(&mut self, ticket: Ticket, error: &ClientError) -> Result<(), SessionError> {
        self.check_detection_ticket(ticket)?;
        self.session.status = SessionStatus::DetectionFailed;
        self.session.last_error = Some(error.to_string());
        Ok(())
    }

    /// Appends the user's message and hands back the request to send.
    pub fn submit_question(&mut self, text: &str) -> Result<ChatJob, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        let detection_id = match (self.session.status, self.session.detection_id()) {
            (SessionStatus::Ready, Some(id)) => id,
            _ => return Err(SessionError::NotReady),
        };
        if self.session.is_awaiting_answer() {
            return Err(SessionError::AwaitingAnswer);
        }

        self.session.transcript.push(ChatMessage::user(text));
        self.session.chat_status = ChatStatus::AwaitingAnswer;
        Ok(ChatJob {
            ticket: Ticket::new(self.generation),
            detection_id,
            question: text.to_string(),
        })
    }

    pub fn resolve_answer(&mut self, ticket: Ticket, answer: &str) -> Result<(), SessionError> {
        self.check_chat_ticket(ticket)?;
        self.session.transcript.push(ChatMessage::ai(answer));
        self.session.chat_status = ChatStatus::Idle;
        Ok(())
    }

    pub fn fail_answer(&mut self, ticket: Ticket, error: &ClientError) -> Result<(), SessionError> {
        self.check_chat_ticket(ticket)?;
        log::warn!("chat {} failed: {}", ticket.request_id, error);
        self.session.transcript.push(ChatMessage::ai(CHAT_FALLBACK_MESSAGE));
        self.session.chat_status = ChatStatus::Idle;
        Ok(())
    }

    /// Dismisses the detection-failure notice without leaving the retry state.
    pub fn dismiss_error(&mut self) {
        self.session.last_error = None;
    }

    fn check_detection_ticket(&self, ticket: Ticket) -> Result<(), SessionError> {
        if ticket.generation != self.generation || !self.session.is_detecting() {
            return Err(SessionError::Stale);
        }
        Ok(())
    }

    fn check_chat_ticket(&self, ticket: Ticket) -> Result<(), SessionError> {
        if ticket.generation != self.generation || !self.session.is_awaiting_answer() {
            return Err(SessionError::Stale);
        }
        Ok(())
    }
}
