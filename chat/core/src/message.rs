//! Transcript Messages
//!
//! One [`Message`] per turn. Messages are created once and never edited; the
//! store only ever appends them.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::api::Source;

/// Opaque message identifier (`msg_<unix-millis>_<suffix>`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new identifier from the clock and a random suffix
    pub fn new() -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        Self(format!("msg_{}_{}", Utc::now().timestamp_millis(), suffix))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The reader
    User,
    /// The RAG service (or a synthesized error notice)
    Assistant,
}

/// One turn in the transcript
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: Role,
    /// Display text (markdown subset)
    pub content: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Cited sources, in service order (assistant answers only)
    pub sources: Option<Vec<Source>>,
    /// Synthesized error notice rather than a real answer
    pub is_error: bool,
}

impl Message {
    /// A message from the reader
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None, false)
    }

    /// An answer from the service
    pub fn assistant(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self::new(Role::Assistant, content.into(), Some(sources), false)
    }

    /// An error notice shown in place of an answer
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), None, true)
    }

    fn new(role: Role, content: String, sources: Option<Vec<Source>>, is_error: bool) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: Utc::now(),
            sources,
            is_error,
        }
    }

    /// Sources, or an empty slice
    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or_default()
    }

    /// Whether this message carries citations worth showing
    pub fn has_sources(&self) -> bool {
        self.role == Role::Assistant && !self.sources().is_empty()
    }

    /// Chunk ids of the cited sources, in order
    pub fn chunk_ids(&self) -> Option<Vec<String>> {
        self.sources
            .as_ref()
            .map(|s| s.iter().map(|src| src.chunk_id.clone()).collect())
    }
}
