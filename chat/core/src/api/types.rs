//! Wire Types
//!
//! Request and response bodies for the RAG service. Field names follow the
//! service's snake_case JSON; optional request fields are omitted when absent.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default number of chunks requested from `/retrieve`
pub const DEFAULT_TOP_K: u32 = 5;

/// A retrieved passage cited in support of an answer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Identifier of the originating text chunk
    pub chunk_id: String,
    /// Excerpt text (full, truncation happens at render time)
    pub text: String,
    /// Descriptive fields, used for display only
    #[serde(default)]
    pub metadata: SourceMetadata,
    /// Relevance score in `[0, 1]`
    pub score: f64,
}

/// Free-form source metadata
///
/// The known fields are typed; anything else the service sends is kept in
/// `extra` untouched. Known fields with an unexpected JSON type read as
/// absent instead of failing the whole response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document path relative to the docs root (e.g. `module-01-ros2/01-intro`)
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Page number within the document
    #[serde(default, deserialize_with = "lenient_page", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Module identifier (e.g. `module-01-ros2`)
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Chapter identifier or title
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    /// Any other fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Scalars become display text; arrays, objects and null become `None`
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Whole numbers (including `3.0` and `"3"`) in `u32` range, else `None`
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(whole) => u32::try_from(whole).ok(),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
                .map(|f| f as u32),
        },
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Metadata filter for `/retrieve` (e.g. `{"module": "module-01-ros2"}`)
pub type RetrieveFilter = BTreeMap<String, Value>;

/// Body of `POST /retrieve`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetrieveRequest {
    /// Search query
    pub query: String,
    /// Number of chunks to return
    pub top_k: u32,
    /// Optional metadata filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<RetrieveFilter>,
}

/// Body of `POST /answer`
///
/// Built with the `with_*` helpers. `selected_text` only reaches the wire
/// when selection mode is on; see [`AnswerRequest::for_wire`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnswerRequest {
    /// The user's question
    pub question: String,
    /// Optional module scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Ask the service to ground only in `selected_text`
    pub selection_mode: bool,
    /// Text the reader highlighted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
}

impl AnswerRequest {
    /// Create a full-corpus request
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    /// Scope the question to a module
    #[must_use]
    pub fn with_module(mut self, module: Option<String>) -> Self {
        self.module = module;
        self
    }

    /// Toggle selection mode
    #[must_use]
    pub fn with_selection_mode(mut self, selection_mode: bool) -> Self {
        self.selection_mode = selection_mode;
        self
    }

    /// Attach the highlighted text
    #[must_use]
    pub fn with_selected_text(mut self, selected_text: impl Into<String>) -> Self {
        self.selected_text = Some(selected_text.into());
        self
    }

    /// Selection mode with the given excerpt
    #[must_use]
    pub fn with_selection(self, selected_text: impl Into<String>) -> Self {
        self.with_selection_mode(true).with_selected_text(selected_text)
    }

    /// The body actually sent: drops `selected_text` outside selection mode
    #[must_use]
    pub fn for_wire(&self) -> Self {
        let mut wire = self.clone();
        if !wire.selection_mode {
            wire.selected_text = None;
        }
        wire
    }
}

/// Generation metadata returned with an answer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerMetadata {
    /// Model that produced the answer
    #[serde(default)]
    pub model: String,
    /// Tokens consumed, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    /// Time spent in retrieval
    #[serde(default)]
    pub retrieval_time_ms: f64,
    /// Time spent generating
    #[serde(default)]
    pub generation_time_ms: f64,
}

/// Response of `POST /answer`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Answer text (markdown subset)
    pub answer: String,
    /// Cited sources, in service order
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Generation metadata
    #[serde(default)]
    pub metadata: AnswerMetadata,
}

/// Thumbs up or down
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    /// Helpful answer
    ThumbsUp,
    /// Unhelpful answer
    ThumbsDown,
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThumbsUp => write!(f, "thumbs_up"),
            Self::ThumbsDown => write!(f, "thumbs_down"),
        }
    }
}

/// Body of `POST /feedback`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeedbackPayload {
    /// The question that was asked
    pub question: String,
    /// The answer being rated
    pub answer: String,
    /// Rating
    pub feedback_type: FeedbackType,
    /// Optional free-text comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Chunk ids cited by the answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

/// Response of `POST /feedback`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Service-defined status string
    pub status: String,
}

/// Response of `GET /health`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service-defined status string (e.g. `healthy`)
    pub status: String,
    /// Service version, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Error body carried by non-2xx responses
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    /// Usually a string; FastAPI validation errors send a list
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub status_code: Option<u16>,
}

impl ErrorBody {
    /// Human-readable detail, if the body had one
    pub(crate) fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_answer_request_omits_absent_fields() {
        let body = serde_json::to_value(AnswerRequest::new("What is ROS 2?").for_wire()).unwrap();
        assert_eq!(
            body,
            json!({"question": "What is ROS 2?", "selection_mode": false})
        );
    }

    #[test]
    fn test_answer_request_selection_mode_carries_text() {
        let request = AnswerRequest::new("Explain this")
            .with_module(Some("module-01-ros2".to_string()))
            .with_selection("Nodes communicate over topics.");
        let body = serde_json::to_value(request.for_wire()).unwrap();
        assert_eq!(
            body,
            json!({
                "question": "Explain this",
                "module": "module-01-ros2",
                "selection_mode": true,
                "selected_text": "Nodes communicate over topics."
            })
        );
    }

    #[test]
    fn test_selected_text_dropped_without_selection_mode() {
        let request = AnswerRequest::new("q").with_selected_text("ignored");
        assert_eq!(request.for_wire().selected_text, None);
    }

    #[test]
    fn test_source_metadata_keeps_unknown_fields() {
        let source: Source = serde_json::from_value(json!({
            "chunk_id": "c1",
            "text": "ROS 2 is a middleware.",
            "metadata": {"module": "module-01-ros2", "section": "intro"},
            "score": 0.95
        }))
        .unwrap();
        assert_eq!(source.metadata.module.as_deref(), Some("module-01-ros2"));
        assert_eq!(source.metadata.source, None);
        assert_eq!(source.metadata.extra.get("section"), Some(&json!("intro")));
    }

    #[test]
    fn test_odd_metadata_types_do_not_fail_the_answer() {
        let response: AnswerResponse = serde_json::from_value(json!({
            "answer": "Nodes are processes.",
            "sources": [
                {"chunk_id": "a", "text": "t", "score": 0.9,
                 "metadata": {"page": 3.0, "chapter": 2, "module": "module-01-ros2"}},
                {"chunk_id": "b", "text": "t", "score": 0.8,
                 "metadata": {"page": "iv", "chapter": ["x"], "source": null}},
                {"chunk_id": "c", "text": "t", "score": 0.7,
                 "metadata": {"page": "12", "module": true}}
            ],
            "metadata": {"model": "m", "retrieval_time_ms": 1.0, "generation_time_ms": 2.0}
        }))
        .unwrap();

        let first = &response.sources[0].metadata;
        assert_eq!(first.page, Some(3));
        assert_eq!(first.chapter.as_deref(), Some("2"));
        assert_eq!(first.module.as_deref(), Some("module-01-ros2"));

        let second = &response.sources[1].metadata;
        assert_eq!(second.page, None);
        assert_eq!(second.chapter, None);
        assert_eq!(second.source, None);

        let third = &response.sources[2].metadata;
        assert_eq!(third.page, Some(12));
        assert_eq!(third.module.as_deref(), Some("true"));
    }

    #[test]
    fn test_page_out_of_range_reads_as_absent() {
        let meta: SourceMetadata = serde_json::from_value(json!({"page": -1})).unwrap();
        assert_eq!(meta.page, None);
        let meta: SourceMetadata = serde_json::from_value(json!({"page": 2.5})).unwrap();
        assert_eq!(meta.page, None);
    }

    #[test]
    fn test_source_without_metadata() {
        let source: Source =
            serde_json::from_value(json!({"chunk_id": "c2", "text": "t", "score": 0.5})).unwrap();
        assert_eq!(source.metadata, SourceMetadata::default());
    }

    #[test]
    fn test_feedback_type_wire_names() {
        assert_eq!(serde_json::to_value(FeedbackType::ThumbsUp).unwrap(), json!("thumbs_up"));
        assert_eq!(FeedbackType::ThumbsDown.to_string(), "thumbs_down");
    }

    #[test]
    fn test_feedback_payload_optional_fields() {
        let payload = FeedbackPayload {
            question: "q".to_string(),
            answer: "a".to_string(),
            feedback_type: FeedbackType::ThumbsDown,
            comment: None,
            sources: Some(vec!["c1".to_string()]),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"question": "q", "answer": "a", "feedback_type": "thumbs_down", "sources": ["c1"]})
        );
    }

    #[test]
    fn test_error_body_detail_variants() {
        let plain: ErrorBody = serde_json::from_str(r#"{"detail":"boom","status_code":500}"#).unwrap();
        assert_eq!(plain.detail_text().as_deref(), Some("boom"));

        let list: ErrorBody = serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert!(list.detail_text().unwrap().contains("field required"));

        let empty: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.detail_text(), None);
    }
}
