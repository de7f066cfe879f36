//! RAG Service API
//!
//! Client, wire types and error normalization for the remote
//! retrieval-augmented-generation service.

mod client;
mod error;
mod types;

pub use client::{ClientConfig, RagApi, RagClient, DEFAULT_API_BASE};
pub use error::{ApiError, ApiErrorKind};
pub use types::{
    AnswerMetadata, AnswerRequest, AnswerResponse, FeedbackPayload, FeedbackResponse,
    FeedbackType, HealthResponse, RetrieveFilter, RetrieveRequest, Source, SourceMetadata,
    DEFAULT_TOP_K,
};
