//! OpenAlex API client.
//!
//! [`AuthorSearchApi`] is the seam the interpreter talks through;
//! [`OpenAlexClient`] is the reqwest implementation against the live service.
//! Failures are mapped into [`ApiError`] at this boundary and never retried.

use async_trait::async_trait;
use reqwest::Client;

use super::error::{ApiError, ApiResult};
use super::models::{
    normalize_entity_id, AuthorProfile, AuthorStats, AuthorSummary, ListResponse, RawAuthor,
    RawWork, TopicShare, Work, WorksFilter,
};

const BASE_URL: &str = "https://api.openalex.org";
const USER_AGENT: &str = "scholar-term (mailto:contact@scholar-term.dev)";
const SEARCH_PER_PAGE: u32 = 10;
const WORKS_PER_PAGE: u32 = 25;

/// Gateway contract used by the command interpreter.
///
/// Every method is a single request: no retries, no caching. `search` and
/// `fetch_works` return `EmptyResult` instead of an empty vector so callers
/// report "nothing found" through the same path as transport failures.
#[async_trait]
pub trait AuthorSearchApi {
    async fn search(&self, query: &str) -> ApiResult<Vec<AuthorSummary>>;
    async fn fetch_profile(&self, author_id: &str) -> ApiResult<AuthorProfile>;
    async fn fetch_works(&self, author_id: &str, filter: &WorksFilter) -> ApiResult<Vec<Work>>;
    async fn fetch_stats(&self, author_id: &str) -> ApiResult<AuthorStats>;
    async fn fetch_topics(&self, author_id: &str) -> ApiResult<Vec<TopicShare>>;
}

/// Reqwest-backed client for the OpenAlex REST API.
#[derive(Clone)]
pub struct OpenAlexClient {
    client: Client,
    base_url: String,
}

impl OpenAlexClient {
    /// Create a client with the contact User-Agent the service asks for.
    pub fn new() -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|_| ApiError::NetworkFailure)?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different base URL (integration tests).
    pub fn with_base_url(base_url: impl Into<String>) -> ApiResult<Self> {
        let mut c = Self::new()?;
        c.base_url = base_url.into();
        Ok(c)
    }

    /// GET a JSON document; reqwest percent-encodes the query pairs.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpFailure(status.as_u16()));
        }

        response.json::<T>().await.map_err(|_| ApiError::MalformedResponse)
    }

    async fn fetch_author(&self, author_id: &str) -> ApiResult<RawAuthor> {
        let id = normalize_entity_id(author_id);
        self.get_json(&format!("/authors/{}", id), &[]).await
    }
}

/// Query pairs for a works request: the `filter` value carries the author id
/// plus any narrowing clause verbatim; the HTTP layer does the encoding.
fn works_query(author_id: &str, filter: &WorksFilter) -> Vec<(&'static str, String)> {
    let mut filter_param = format!("author.id:{}", normalize_entity_id(author_id));
    let mut sort_param = None;
    match filter {
        WorksFilter::Recent => sort_param = Some("publication_date:desc"),
        WorksFilter::TopCited => sort_param = Some("cited_by_count:desc"),
        WorksFilter::TextSearch(term) => {
            filter_param.push_str(&format!(",title.search:{}", term));
        }
        WorksFilter::ByYear(year) => {
            filter_param.push_str(&format!(",publication_year:{}", year));
            sort_param = Some("cited_by_count:desc");
        }
    }
    let mut query = vec![
        ("filter", filter_param),
        ("per-page", WORKS_PER_PAGE.to_string()),
    ];
    if let Some(sort) = sort_param {
        query.push(("sort", sort.to_string()));
    }
    query
}

#[async_trait]
impl AuthorSearchApi for OpenAlexClient {
    async fn search(&self, query: &str) -> ApiResult<Vec<AuthorSummary>> {
        let params = [
            ("search", query.to_string()),
            ("per-page", SEARCH_PER_PAGE.to_string()),
        ];
        let list: ListResponse<RawAuthor> = self.get_json("/authors", &params).await?;
        if list.results.is_empty() {
            return Err(ApiError::EmptyResult);
        }
        // Relevance order comes from the service and must be preserved:
        // selection is by 1-based position in this exact order.
        Ok(list.results.into_iter().map(RawAuthor::into_summary).collect())
    }

    async fn fetch_profile(&self, author_id: &str) -> ApiResult<AuthorProfile> {
        Ok(self.fetch_author(author_id).await?.into_profile())
    }

    async fn fetch_works(&self, author_id: &str, filter: &WorksFilter) -> ApiResult<Vec<Work>> {
        let query = works_query(author_id, filter);
        let list: ListResponse<RawWork> = self.get_json("/works", &query).await?;
        if list.results.is_empty() {
            return Err(ApiError::EmptyResult);
        }
        Ok(list.results.into_iter().map(RawWork::into_work).collect())
    }

    async fn fetch_stats(&self, author_id: &str) -> ApiResult<AuthorStats> {
        Ok(self.fetch_author(author_id).await?.into_profile().stats)
    }

    async fn fetch_topics(&self, author_id: &str) -> ApiResult<Vec<TopicShare>> {
        let topics = self.fetch_author(author_id).await?.into_profile().topics;
        if topics.is_empty() {
            return Err(ApiError::EmptyResult);
        }
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(query: &'a [(&str, String)], key: &str) -> Option<&'a str> {
        query.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_works_query_recent() {
        let query = works_query("A1", &WorksFilter::Recent);
        assert_eq!(value_of(&query, "filter"), Some("author.id:A1"));
        assert_eq!(value_of(&query, "per-page"), Some("25"));
        assert_eq!(value_of(&query, "sort"), Some("publication_date:desc"));
    }

    #[test]
    fn test_works_query_text_search() {
        let query = works_query(
            "https://openalex.org/A1",
            &WorksFilter::TextSearch("mars".into()),
        );
        assert_eq!(value_of(&query, "filter"), Some("author.id:A1,title.search:mars"));
        assert_eq!(value_of(&query, "sort"), None);
    }

    #[test]
    fn test_works_query_keeps_reserved_characters_in_term() {
        // The term goes into the filter value untouched; encoding belongs
        // to the request builder, not the filter string.
        let query = works_query("A1", &WorksFilter::TextSearch("nature & nurture".into()));
        assert_eq!(
            value_of(&query, "filter"),
            Some("author.id:A1,title.search:nature & nurture")
        );
    }

    #[test]
    fn test_works_query_by_year() {
        let query = works_query("A1", &WorksFilter::ByYear(1977));
        assert_eq!(
            value_of(&query, "filter"),
            Some("author.id:A1,publication_year:1977")
        );
        assert_eq!(value_of(&query, "sort"), Some("cited_by_count:desc"));
    }
}
