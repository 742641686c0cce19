//! API Gateway Module
//!
//! HTTP access to the OpenAlex author/works search service. Issues single
//! requests, parses JSON into the domain types, and maps transport failures
//! into the `ApiError` taxonomy. No retries, no caching.

pub mod client;
pub mod error;
pub mod models;

pub use client::{AuthorSearchApi, OpenAlexClient};
pub use error::{ApiError, ApiResult};
pub use models::{
    normalize_entity_id, AuthorProfile, AuthorStats, AuthorSummary, TopicShare, Work, WorksFilter,
};
