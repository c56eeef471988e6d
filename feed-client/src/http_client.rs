use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FeedClientError;
use crate::{Comment, FeedApi, FeedFilters, FeedPage, NewPost, Post, Profile, ProfileUpdate};

#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LikeResponse {
    likes: i64,
}

impl FeedClient {
    pub fn connect(endpoint: &str) -> Result<Self, FeedClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Bearer token sent with write requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t: &String| !t.trim().is_empty());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, FeedClientError> {
        let token = self.token.as_deref().ok_or(FeedClientError::Unauthorized)?;
        let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| FeedClientError::Unauthorized)?;
        Ok(req.header(AUTHORIZATION, value))
    }

    async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, FeedClientError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(FeedClientError::from_http_response(resp).await)
        }
    }
}

#[async_trait]
impl FeedApi for FeedClient {
    async fn list_posts(&self, filters: &FeedFilters) -> Result<FeedPage, FeedClientError> {
        let query = filters.to_query();
        debug!(?query, "listing posts");
        let resp = self
            .client
            .get(self.url("/posts"))
            .query(&query)
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn get_post(&self, id: i64) -> Result<Post, FeedClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/posts/{id}")))
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn categories(&self) -> Result<Vec<String>, FeedClientError> {
        let resp = self
            .client
            .get(self.url("/posts/categories"))
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn popular_tags(&self, limit: Option<u32>) -> Result<Vec<String>, FeedClientError> {
        let mut req = self.client.get(self.url("/posts/tags/popular"));
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        Self::read(req.send().await?).await
    }

    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, FeedClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/posts/{post_id}/comments")))
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, FeedClientError> {
        let req = self.authorized(self.client.post(self.url("/posts")))?;
        Self::read(req.json(post).send().await?).await
    }

    async fn like_post(&self, id: i64) -> Result<i64, FeedClientError> {
        let req = self.authorized(self.client.post(self.url(&format!("/posts/{id}/like"))))?;
        let like: LikeResponse = Self::read(req.send().await?).await?;
        Ok(like.likes)
    }

    async fn add_comment(&self, post_id: i64, content: &str) -> Result<Comment, FeedClientError> {
        let req = self.authorized(
            self.client
                .post(self.url(&format!("/posts/{post_id}/comments"))),
        )?;
        let resp = req
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn user_profile(&self, user_id: i64) -> Result<Profile, FeedClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/profiles/{user_id}")))
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn my_profile(&self) -> Result<Profile, FeedClientError> {
        let req = self.authorized(self.client.get(self.url("/profile")))?;
        Self::read(req.send().await?).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, FeedClientError> {
        let req = self.authorized(self.client.put(self.url("/profile")))?;
        Self::read(req.json(update).send().await?).await
    }
}
