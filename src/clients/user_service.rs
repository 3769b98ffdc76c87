use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::clients::{AssignmentRecord, ClientError, Existence, UserDirectory};
use crate::config;

const SERVICE: &str = "user-service";

pub struct UserServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl UserServiceClient {
    pub fn from_config() -> Self {
        let settings = &config::config().clients;
        Self::new(
            settings.user_service_url.clone(),
            Duration::from_millis(settings.probe_timeout_ms),
        )
    }

    pub fn new(base_url: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build user-service HTTP client");

        Self { http, base_url }
    }

    fn placement_url(&self, user_id: Uuid, verb: &str, record: &AssignmentRecord) -> String {
        format!(
            "{}/api/users/{}/{}-{}",
            self.base_url,
            user_id,
            verb,
            record.target_segment()
        )
    }
}

#[async_trait]
impl UserDirectory for UserServiceClient {
    async fn user_exists(&self, user_id: Uuid) -> Existence {
        let url = format!("{}/api/users/{}/exists", self.base_url, user_id);

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

    async fn assign(&self, user_id: Uuid, record: &AssignmentRecord) -> Result<(), ClientError> {
        let url = self.placement_url(user_id, "assign-to", record);
        let resp = self
            .http
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|source| ClientError::Transport { service: SERVICE, source })?;

        if !resp.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                service: SERVICE,
                status: resp.status().as_u16(),
            });
        }

        Ok(())
    }

    async fn remove(&self, user_id: Uuid, record: &AssignmentRecord) -> Result<(), ClientError> {
        let url = self.placement_url(user_id, "remove-from", record);
        let resp = self
            .http
            .delete(&url)
            .json(record)
            .send()
            .await
            .map_err(|source| ClientError::Transport { service: SERVICE, source })?;

        if !resp.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                service: SERVICE,
                status: resp.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_urls_follow_the_wire_contract() {
        let client = UserServiceClient::new(
            "http://users.internal".to_string(),
            Duration::from_millis(100),
        );
        let user = Uuid::new_v4();
        let dept = Uuid::new_v4();

        assert_eq!(
            client.placement_url(user, "assign-to", &AssignmentRecord::department(dept)),
            format!("http://users.internal/api/users/{}/assign-to-department", user)
        );
        assert_eq!(
            client.placement_url(user, "remove-from", &AssignmentRecord::team(dept, Uuid::new_v4())),
            format!("http://users.internal/api/users/{}/remove-from-team", user)
        );
    }
}
