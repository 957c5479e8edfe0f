//! HTTP client for the Sanity query and mutation APIs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::error::{Result, StoreError};
use super::{queries, ContentStore};
use crate::config::SanityConfig;
use crate::content::{CreatedDocument, NewComment, Post, PostSummary, Slug};

/// Envelope of a query response
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Envelope of a mutation response
#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(rename = "transactionId", default)]
    transaction_id: Option<String>,
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SlugOnly {
    #[serde(default)]
    slug: Option<Slug>,
}

/// Content store backed by a Sanity project
pub struct SanityClient {
    http: Client,
    config: SanityConfig,
}

impl SanityClient {
    /// Create a client for the configured project
    pub fn new(config: SanityConfig) -> Result<Self> {
        if config.project_id.is_empty() {
            return Err(StoreError::MissingProject);
        }
        Ok(Self {
            http: Client::new(),
            config,
        })
    }

    /// URL of the query endpoint
    ///
    /// Authenticated reads go to the live API; the CDN only serves public data.
    fn query_url(&self) -> String {
        let cdn = self.config.use_cdn && self.config.token.is_none();
        format!(
            "{}/data/query/{}",
            self.config.api_base(cdn),
            self.config.dataset
        )
    }

    /// URL of the mutation endpoint
    fn mutate_url(&self) -> String {
        format!(
            "{}/data/mutate/{}",
            self.config.api_base(false),
            self.config.dataset
        )
    }

    /// Run a GROQ query; `params` are bound as `$name` with JSON-encoded values
    async fn fetch<T: DeserializeOwned>(&self, groq: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut query = vec![("query".to_string(), groq.to_string())];
        for (name, value) in params {
            query.push((format!("${}", name), serde_json::to_string(value)?));
        }

        let mut request = self.http.get(self.query_url()).query(&query);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("GROQ query with {} param(s)", params.len());
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_query(status, body)
    }
}

/// Unwrap the `result` of a query response, or turn a failed status into an error
fn decode_query<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<T> {
    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }
    let envelope: QueryResponse<T> = serde_json::from_str(&body)?;
    Ok(envelope.result)
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch_posts(&self) -> Result<Vec<PostSummary>> {
        let posts: Option<Vec<PostSummary>> = self.fetch(queries::ALL_POSTS, &[]).await?;
        Ok(posts.unwrap_or_default())
    }

    async fn fetch_post(&self, slug: &str) -> Result<Option<Post>> {
        self.fetch(queries::POST_BY_SLUG, &[("slug", slug)]).await
    }

    async fn fetch_slugs(&self) -> Result<Vec<String>> {
        let rows: Option<Vec<SlugOnly>> = self.fetch(queries::ALL_SLUGS, &[]).await?;
        Ok(rows
            .unwrap_or_default()
            .into_iter()
            .filter_map(|row| row.slug)
            .map(|slug| slug.current)
            .filter(|slug| !slug.is_empty())
            .collect())
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<CreatedDocument> {
        let token = self.config.token.as_ref().ok_or(StoreError::MissingToken)?;
        let mutations = json!({
            "mutations": [{ "create": comment.to_document() }]
        });

        let response = self
            .http
            .post(self.mutate_url())
            .query(&[("returnIds", "true")])
            .bearer_auth(token)
            .json(&mutations)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: MutateResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            "Comment mutation committed in transaction {:?}",
            result.transaction_id
        );
        result
            .results
            .into_iter()
            .next()
            .map(|r| CreatedDocument { id: r.id })
            .ok_or(StoreError::NoDocumentId)
    }
}
