use crate::models::ReportClassroomRequest;
use crate::services::directions::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Destination for "missing classroom" reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn submit(&self, report: &ReportClassroomRequest) -> Result<(), ProviderError>;
}

/// EmailJS REST client
///
/// Sends each report through a pre-configured EmailJS template.
pub struct EmailJsClient {
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
    client: Client,
}

impl EmailJsClient {
    pub fn new(
        endpoint: String,
        service_id: String,
        template_id: String,
        public_key: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            service_id,
            template_id,
            public_key,
            client,
        })
    }
}

#[async_trait]
impl ReportSink for EmailJsClient {
    async fn submit(&self, report: &ReportClassroomRequest) -> Result<(), ProviderError> {
        let payload = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": {
                "building": report.building,
                "roomNumber": report.room_number,
                "description": report.description,
                "email": report.email.clone().unwrap_or_default(),
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(ProviderError::ApiError(format!("{} - {}", status, body)));
        }

        tracing::debug!("Sent report for {} {}", report.building, report.room_number);

        Ok(())
    }
}
