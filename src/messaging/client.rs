//! REST adapter for the Pssst message service.
//!
//! Speaks plain JSON over HTTP to a Pssst-compatible server. The adapter
//! moves opaque message text only; end-to-end protocol details beyond
//! push/pull (key handling, box encryption) are the server library's concern
//! and never appear here.
//!
//! Endpoints:
//! - `POST {server}/1/{receiver}` with `{"from": ..., "message": ...}`
//! - `GET  {server}/1/{user}/pull` returning `{"messages": [...]}`
//!
//! An optional bearer token from the profile authenticates both calls.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::config::Profile;
use crate::messaging::{MessageService, TransportError};

/// Request body for a push.
#[derive(Serialize, Debug)]
struct PushRequest<'a> {
    from: &'a str,
    message: &'a str,
}

/// Response body of a pull.
#[derive(Deserialize, Debug)]
struct PullResponse {
    #[serde(default)]
    messages: Vec<String>,
}

/// HTTP client for a Pssst-compatible REST server.
pub struct PssstClient {
    profile: Profile,
    identity: String,
    client: reqwest::Client,
}

impl PssstClient {
    pub fn new(profile: Profile) -> Self {
        let identity = format!("pssst.{}", profile.username);
        Self {
            profile,
            identity,
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.profile.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Maps a non-success response into a `TransportError::Api`, reading the
/// body for the message text.
async fn api_error(response: reqwest::Response) -> TransportError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("Server error: {} - {}", status, message);
    TransportError::Api { status, message }
}

#[async_trait]
impl MessageService for PssstClient {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn endpoint(&self) -> &str {
        &self.profile.server
    }

    async fn push(&self, receiver: &str, message: &str) -> Result<(), TransportError> {
        let url = format!("{}/1/{}", self.profile.server, receiver);
        let body = PushRequest {
            from: &self.profile.username,
            message,
        };

        info!("Pushing {} chars to {}", message.chars().count(), receiver);

        let response = self
            .request(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("Push response status: {}", response.status());

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    async fn pull(&self) -> Result<Vec<Vec<u8>>, TransportError> {
        let url = format!("{}/1/{}/pull", self.profile.server, self.profile.username);

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("Pull response status: {}", response.status());

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let pulled: PullResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        if !pulled.messages.is_empty() {
            info!("Pulled {} message(s)", pulled.messages.len());
        }

        Ok(pulled.messages.into_iter().map(String::into_bytes).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_profile() -> Profile {
        Profile {
            username: "alice".to_string(),
            token: None,
            server: "https://pssst.example.org".to_string(),
        }
    }

    #[test]
    fn identity_is_the_namespaced_username() {
        let client = PssstClient::new(test_profile());
        assert_eq!(client.identity(), "pssst.alice");
    }

    #[test]
    fn endpoint_is_the_server_address() {
        let client = PssstClient::new(test_profile());
        assert_eq!(client.endpoint(), "https://pssst.example.org");
    }
}
