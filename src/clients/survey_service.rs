use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::clients::{Existence, SurveyDirectory};
use crate::config;

const SERVICE: &str = "survey-service";

pub struct SurveyServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl SurveyServiceClient {
    pub fn from_config() -> Self {
        let settings = &config::config().clients;
        Self::new(
            settings.survey_service_url.clone(),
            Duration::from_millis(settings.probe_timeout_ms),
        )
    }

    pub fn new(base_url: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build survey-service HTTP client");

        Self { http, base_url }
    }
}

#[async_trait]
impl SurveyDirectory for SurveyServiceClient {
    async fn survey_exists(&self, survey_id: Uuid) -> Existence {
        let url = format!("{}/api/surveys/{}/exists", self.base_url, survey_id);

        match self.http.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<bool>().await {
                Ok(true) => Existence::Present,
                Ok(false) => Existence::Absent,
                Err(e) => {
                    warn!("{} exists probe returned an unreadable body: {}", SERVICE, e);
                    Existence::Unknown
                }
            },
            Ok(resp) => {
                warn!("{} exists probe returned status {}", SERVICE, resp.status());
                Existence::Unknown
            }
            Err(e) => {
                warn!("{} exists probe failed: {}", SERVICE, e);
                Existence::Unknown
            }
        }
    }
}
