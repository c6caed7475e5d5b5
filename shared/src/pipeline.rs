//! Request pipelines between the Session Store and the backend.
//!
//! Dispatch happens through the store (`begin_detection`, `submit_question`),
//! the network call through `run_*`, and reconciliation through `apply_*`,
//! which is where stale replies are dropped.

use async_trait::async_trait;

use crate::error::{ClientError, SessionError};
use crate::models::{ChatResponse, DetectResponse, DetectionId};
use crate::session::{ChatJob, DetectionJob, SessionStore, Ticket};

#[async_trait(?Send)]
pub trait DetectionBackend<I> {
    async fn detect(&self, image: &I, ticket: Ticket) -> Result<DetectResponse, ClientError>;
}

#[async_trait(?Send)]
pub trait ChatBackend {
    async fn ask(
        &self,
        detection_id: DetectionId,
        question: &str,
        ticket: Ticket,
    ) -> Result<ChatResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct DetectionReply {
    pub ticket: Ticket,
    pub outcome: Result<DetectResponse, ClientError>,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub ticket: Ticket,
    pub outcome: Result<ChatResponse, ClientError>,
}

/// What reconciling a reply did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Resolved,
    Failed(ClientError),
    Discarded,
}

pub async fn run_detection<I, B>(backend: &B, job: DetectionJob<I>) -> DetectionReply
where
    B: DetectionBackend<I> + ?Sized,
{
    log::info!("sending detection request {}", job.ticket.request_id());
    let outcome = backend.detect(&job.image, job.ticket).await;
    DetectionReply { ticket: job.ticket, outcome }
}

pub fn apply_detection<I>(store: &mut SessionStore<I>, reply: DetectionReply) -> Applied {
    let DetectionReply { ticket, outcome } = reply;
    let result = match outcome {
        Ok(response) => {
            let count = response.detection_results.len();
            store
                .resolve_detection(ticket, response.into())
                .map(|_| {
                    log::info!("detection {} finished with {} objects", ticket.request_id(), count);
                    Applied::Resolved
                })
        }
        Err(error) => store.fail_detection(ticket, &error).map(|_| {
            log::error!("detection {} failed: {}", ticket.request_id(), error);
            Applied::Failed(error)
        }),
    };
    discard_stale(result, ticket)
}

pub async fn run_chat<B>(backend: &B, job: ChatJob) -> ChatReply
where
    B: ChatBackend + ?Sized,
{
    log::info!("asking about detection {} ({})", job.detection_id, job.ticket.request_id());
    let outcome = backend.ask(job.detection_id, &job.question, job.ticket).await;
    ChatReply { ticket: job.ticket, outcome }
}

pub fn apply_chat<I>(store: &mut SessionStore<I>, reply: ChatReply) -> Applied {
    let ChatReply { ticket, outcome } = reply;
    let result = match outcome {
        Ok(response) => store
            .resolve_answer(ticket, &response.answer)
            .map(|_| Applied::Resolved),
        Err(error) => store
            .fail_answer(ticket, &error)
            .map(|_| Applied::Failed(error)),
    };
    discard_stale(result, ticket)
}

fn discard_stale(result: Result<Applied, SessionError>, ticket: Ticket) -> Applied {
    result.unwrap_or_else(|err| {
        log::debug!("dropping reply {}: {}", ticket.request_id(), err);
        Applied::Discarded
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatRole, Detection};
    use crate::session::{CHAT_FALLBACK_MESSAGE, SessionStatus};
    use futures::executor::block_on;
    use std::cell::Cell;

    struct FakeDetector {
        calls: Cell<usize>,
        fail: bool,
    }

    impl FakeDetector {
        fn new(fail: bool) -> Self {
            Self { calls: Cell::new(0), fail }
        }
    }

    #[async_trait(?Send)]
    impl DetectionBackend<String> for FakeDetector {
        async fn detect(&self, image: &String, _ticket: Ticket) -> Result<DetectResponse, ClientError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ClientError::DetectionFailure("Server error: 500".into()));
            }
            Ok(DetectResponse {
                id: DetectionId(self.calls.get() as i64),
                annotated_image: format!("/media/annotated/{}", image),
                detection_results: vec![Detection {
                    class: "cat".into(),
                    confidence: "92%".into(),
                    bbox: vec![1.0, 2.0, 3.0, 4.0],
                }],
            })
        }
    }

    struct FakeChat {
        answer: Option<&'static str>,
    }

    #[async_trait(?Send)]
    impl ChatBackend for FakeChat {
        async fn ask(
            &self,
            _detection_id: DetectionId,
            _question: &str,
            _ticket: Ticket,
        ) -> Result<ChatResponse, ClientError> {
            match self.answer {
                Some(answer) => Ok(ChatResponse { answer: answer.into() }),
                None => Err(ClientError::ChatFailure("Network error".into())),
            }
        }
    }

    fn staged(name: &str) -> SessionStore<String> {
        let mut store = SessionStore::new();
        store.stage_image(name.to_string()).unwrap();
        store
    }

    #[test]
    fn successful_detection_populates_session() {
        let backend = FakeDetector::new(false);
        let mut store = staged("a.jpg");
        let job = store.begin_detection().unwrap();

        let reply = block_on(run_detection(&backend, job));
        assert_eq!(apply_detection(&mut store, reply), Applied::Resolved);
        assert_eq!(backend.calls.get(), 1);
        assert_eq!(store.session().status(), SessionStatus::Ready);
        assert_eq!(store.session().annotated_image(), Some("/media/annotated/a.jpg"));
    }

    #[test]
    fn failed_detection_is_reported_once() {
        let backend = FakeDetector::new(true);
        let mut store = staged("a.jpg");
        let job = store.begin_detection().unwrap();

        let reply = block_on(run_detection(&backend, job));
        match apply_detection(&mut store, reply) {
            Applied::Failed(ClientError::DetectionFailure(_)) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.session().status(), SessionStatus::DetectionFailed);
        assert_eq!(store.session().image().map(String::as_str), Some("a.jpg"));
    }

    #[test]
    fn reply_for_superseded_image_is_discarded() {
        let backend = FakeDetector::new(false);
        let mut store = staged("a.jpg");
        let old_job = store.begin_detection().unwrap();
        let old_reply = block_on(run_detection(&backend, old_job));

        store.clear_image();
        store.stage_image("b.jpg".to_string()).unwrap();
        assert_eq!(apply_detection(&mut store, old_reply), Applied::Discarded);
        assert_eq!(store.session().status(), SessionStatus::Staged);
        assert!(store.session().detections().is_empty());
    }

    #[test]
    fn chat_answer_lands_in_transcript() {
        let mut store = staged("a.jpg");
        let job = store.begin_detection().unwrap();
        let reply = block_on(run_detection(&FakeDetector::new(false), job));
        apply_detection(&mut store, reply);

        let chat = store.submit_question("What is this?").unwrap();
        let reply = block_on(run_chat(&FakeChat { answer: Some("**Cat**.") }, chat));
        assert_eq!(apply_chat(&mut store, reply), Applied::Resolved);

        let transcript = store.session().transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, ChatRole::Ai);
        assert_eq!(transcript[1].content, "**Cat**.");
    }

    #[test]
    fn chat_failure_degrades_to_fallback_message() {
        let mut store = staged("a.jpg");
        let job = store.begin_detection().unwrap();
        let reply = block_on(run_detection(&FakeDetector::new(false), job));
        apply_detection(&mut store, reply);

        let chat = store.submit_question("What is this?").unwrap();
        let reply = block_on(run_chat(&FakeChat { answer: None }, chat));
        assert!(matches!(apply_chat(&mut store, reply), Applied::Failed(_)));
        assert_eq!(store.session().transcript()[1].content, CHAT_FALLBACK_MESSAGE);
        assert!(store.session().can_ask());
    }
}
