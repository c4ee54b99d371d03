use crate::models::ClassroomRecord;
use crate::services::directory::{DirectoryError, DirectorySource};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// HTTP client for the classroom endpoints of this service
///
/// Lets a front end (or another service) use a remote GoWhere instance
/// as its directory source.
pub struct DirectoryClient {
    base_url: String,
    client: Client,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_list(&self, url: &str) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn get(&self, id: &str) -> Result<ClassroomRecord, DirectoryError> {
        let url = format!("{}/classrooms/{}", self.base_url, urlencoding::encode(id));

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(id.to_string()));
        }

        Ok(response.error_for_status()?.json().await?)
    }
}

#[async_trait]
impl DirectorySource for DirectoryClient {
    async fn list_all(&self) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        self.fetch_list(&format!("{}/classrooms", self.base_url)).await
    }

    async fn search_remote(&self, query: &str) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        let url = format!(
            "{}/classrooms/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        self.fetch_list(&url).await
    }
}
