//! Conversation Store
//!
//! Owns the transcript, the "awaiting response" flag and the error banner for
//! one mounted widget. The store is a cheap clonable handle: the surface
//! builds it once at its root and hands clones to whatever needs it.
//!
//! # Ordering
//!
//! Within one [`ChatStore::send_message`] call the user message is appended
//! before the request starts, and the reply (or error notice) is appended
//! after it resolves, before the loading flag drops. Two sends issued
//! back-to-back are not serialized: both user messages land immediately and
//! the replies land in completion order.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::{AnswerRequest, ApiError, FeedbackPayload, FeedbackType, RagApi};
use crate::message::{Message, MessageId, Role};

/// Transcript text used in place of an answer when the request fails
pub const ERROR_REPLY: &str =
    "Sorry, I encountered an error while processing your question. Please try again.";

/// Banner shown when `/answer` fails
pub const ANSWER_FAILED_BANNER: &str =
    "Failed to get response. Please check your connection and try again.";

/// Banner shown when `/feedback` fails
pub const FEEDBACK_FAILED_BANNER: &str = "Failed to submit feedback. Please try again.";

/// A point-in-time copy of the conversation, for rendering
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversationState {
    /// Transcript in creation order
    pub messages: Vec<Message>,
    /// A send is outstanding
    pub is_loading: bool,
    /// Active error banner
    pub error: Option<String>,
}

impl ConversationState {
    /// Role of the most recent message
    pub fn last_role(&self) -> Option<Role> {
        self.messages.last().map(|m| m.role)
    }
}

/// Result of a send, as seen by the input control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank; nothing happened
    Skipped,
    /// An answer was appended
    Answered,
    /// An error notice was appended and the banner set
    Failed,
}

/// Why a feedback request was dropped before reaching the network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackSkip {
    /// No message with that id
    NotFound,
    /// The target is the first message, so there is no question before it
    NoQuestion,
    /// The target is not an assistant message
    NotAnAnswer,
    /// The message before the target is not a user message
    NotAQuestion,
}

/// Result of [`ChatStore::send_feedback`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// The service accepted the feedback
    Submitted,
    /// Silently dropped; see the reason
    Skipped(FeedbackSkip),
    /// The request failed and the banner was set
    Failed,
}

#[derive(Default)]
struct StoreState {
    messages: Vec<Message>,
    in_flight: usize,
    error: Option<String>,
}

struct Inner {
    api: Arc<dyn RagApi>,
    state: Mutex<StoreState>,
}

/// Clears the loading flag on every exit path of a send
struct LoadingGuard {
    inner: Arc<Inner>,
}

impl LoadingGuard {
    fn enter(inner: &Arc<Inner>, state: &mut StoreState) -> Self {
        state.in_flight += 1;
        Self {
            inner: Arc::clone(inner),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Handle to the conversation state of one widget
#[derive(Clone)]
pub struct ChatStore {
    inner: Arc<Inner>,
}

impl ChatStore {
    /// Create an empty store backed by `api`
    pub fn new(api: Arc<dyn RagApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: Mutex::new(StoreState::default()),
            }),
        }
    }

    /// The API this store talks to
    pub fn api(&self) -> Arc<dyn RagApi> {
        Arc::clone(&self.inner.api)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ConversationState {
        let state = self.inner.state.lock();
        ConversationState {
            messages: state.messages.clone(),
            is_loading: state.in_flight > 0,
            error: state.error.clone(),
        }
    }

    /// Copy of the transcript
    pub fn messages(&self) -> Vec<Message> {
        self.inner.state.lock().messages.clone()
    }

    /// Number of messages in the transcript
    pub fn len(&self) -> usize {
        self.inner.state.lock().messages.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any send is outstanding
    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().in_flight > 0
    }

    /// Active error banner
    pub fn error(&self) -> Option<String> {
        self.inner.state.lock().error.clone()
    }

    /// Role of the most recent message
    pub fn last_role(&self) -> Option<Role> {
        self.inner.state.lock().messages.last().map(|m| m.role)
    }

    /// Ask a question against the whole corpus (or one module)
    pub async fn send_message(&self, content: &str, module: Option<String>) -> SendOutcome {
        let question = content.trim();
        if question.is_empty() {
            return SendOutcome::Skipped;
        }
        self.ask(AnswerRequest::new(question).with_module(module))
            .await
    }

    /// Ask a question grounded only in `selected_text`
    pub async fn send_message_with_selection(
        &self,
        content: &str,
        selected_text: &str,
        module: Option<String>,
    ) -> SendOutcome {
        let question = content.trim();
        if question.is_empty() {
            return SendOutcome::Skipped;
        }
        let request = AnswerRequest::new(question).with_module(module);
        let request = if selected_text.trim().is_empty() {
            request
        } else {
            request.with_selection(selected_text)
        };
        self.ask(request).await
    }

    async fn ask(&self, request: AnswerRequest) -> SendOutcome {
        let loading = {
            let mut state = self.inner.state.lock();
            let user = Message::user(request.question.clone());
            debug!(message_id = %user.id, "user message appended");
            state.messages.push(user);
            state.error = None;
            LoadingGuard::enter(&self.inner, &mut state)
        };

        let result = self.inner.api.answer_question(&request).await;
        let outcome = self.record_answer(result);
        drop(loading);
        outcome
    }

    fn record_answer(&self, result: Result<crate::api::AnswerResponse, ApiError>) -> SendOutcome {
        let mut state = self.inner.state.lock();
        match result {
            Ok(response) => {
                info!(
                    model = %response.metadata.model,
                    sources = response.sources.len(),
                    retrieval_ms = response.metadata.retrieval_time_ms,
                    generation_ms = response.metadata.generation_time_ms,
                    "answer received"
                );
                state
                    .messages
                    .push(Message::assistant(response.answer, response.sources));
                SendOutcome::Answered
            }
            Err(e) => {
                warn!(error = %e, "Error getting answer");
                state.messages.push(Message::error(ERROR_REPLY));
                state.error = Some(ANSWER_FAILED_BANNER.to_string());
                SendOutcome::Failed
            }
        }
    }

    /// Empty the transcript and clear the banner
    ///
    /// An outstanding send is not cancelled; its reply still lands.
    pub fn clear_messages(&self) {
        let mut state = self.inner.state.lock();
        state.messages.clear();
        state.error = None;
    }

    /// Dismiss the banner, leaving the transcript alone
    pub fn clear_error(&self) {
        self.inner.state.lock().error = None;
    }

    /// Rate the answer `message_id`
    ///
    /// The question is taken from the message right before it. Anything that
    /// doesn't look like a question/answer pair is dropped with a warning.
    pub async fn send_feedback(
        &self,
        message_id: &MessageId,
        feedback_type: FeedbackType,
        comment: Option<String>,
    ) -> FeedbackOutcome {
        let payload = {
            let state = self.inner.state.lock();
            match feedback_pair(&state.messages, message_id) {
                Ok((question, answer)) => FeedbackPayload {
                    question: question.content.clone(),
                    answer: answer.content.clone(),
                    feedback_type,
                    comment,
                    sources: answer.chunk_ids(),
                },
                Err(reason) => {
                    warn!(message_id = %message_id, ?reason, "Invalid message pair for feedback");
                    return FeedbackOutcome::Skipped(reason);
                }
            }
        };

        match self.inner.api.submit_feedback(&payload).await {
            Ok(response) => {
                info!(status = %response.status, %feedback_type, "Feedback submitted successfully");
                FeedbackOutcome::Submitted
            }
            Err(e) => {
                warn!(error = %e, "Error submitting feedback");
                self.inner.state.lock().error = Some(FEEDBACK_FAILED_BANNER.to_string());
                FeedbackOutcome::Failed
            }
        }
    }
}

/// Find `(question, answer)` for feedback on `message_id`
fn feedback_pair<'a>(
    messages: &'a [Message],
    message_id: &MessageId,
) -> Result<(&'a Message, &'a Message), FeedbackSkip> {
    let index = messages
        .iter()
        .position(|m| &m.id == message_id)
        .ok_or(FeedbackSkip::NotFound)?;
    if index == 0 {
        return Err(FeedbackSkip::NoQuestion);
    }

    let answer = &messages[index];
    let question = &messages[index - 1];
    if answer.role != Role::Assistant {
        return Err(FeedbackSkip::NotAnAnswer);
    }
    if question.role != Role::User {
        return Err(FeedbackSkip::NotAQuestion);
    }
    Ok((question, answer))
}
