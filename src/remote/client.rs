// ABOUTME: HTTP client for communicating with the transfer backend API
// ABOUTME: Handles connection checks, table listing, and transfer dispatch

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::{
    ConnectPayload, LoadConnectionResponse, SavePayload, StatusResponse, TablesResponse,
    TransferOutcome, TransferRequest,
};
use crate::profile::ConnectionProfile;
use crate::session::Role;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct BackendClient {
    client: Client,
    api_base_url: String,
}

impl BackendClient {
    pub fn new(api_base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base_url,
        })
    }

    pub async fn test_connection(&self, profile: &ConnectionProfile) -> Result<StatusResponse> {
        let url = format!("{}/api/test-connection", self.api_base_url);
        self.execute(self.client.post(&url).json(profile), "testing the connection")
            .await
    }

    pub async fn connect(&self, role: Role, profile: &ConnectionProfile) -> Result<StatusResponse> {
        let url = format!("{}/api/connect", self.api_base_url);
        let payload = ConnectPayload {
            profile: profile.clone(),
            role: role.to_string(),
        };
        self.execute(self.client.post(&url).json(&payload), "connecting")
            .await
    }

    pub async fn save_connection(
        &self,
        name: &str,
        profile: &ConnectionProfile,
    ) -> Result<StatusResponse> {
        let url = format!("{}/api/save-connection", self.api_base_url);
        let payload = SavePayload {
            profile: profile.clone(),
            name: name.to_string(),
        };
        self.execute(self.client.post(&url).json(&payload), "saving the connection")
            .await
    }

    pub async fn load_connection(&self, name: &str) -> Result<LoadConnectionResponse> {
        let url = format!("{}/api/load-connection/{}", self.api_base_url, name);
        self.execute(self.client.get(&url), "loading the saved connection")
            .await
    }

    pub async fn list_tables(&self) -> Result<TablesResponse> {
        let url = format!("{}/api/get-tables/source", self.api_base_url);
        self.execute(self.client.get(&url), "listing source tables")
            .await
    }

    pub async fn run_transfer(&self, request: &TransferRequest) -> Result<TransferOutcome> {
        let url = format!("{}/api/transfer", self.api_base_url);
        self.execute(self.client.post(&url).json(request), "running the transfer")
            .await
    }

    // The backend reports operation failures inside the JSON envelope, often
    // with a non-2xx status. Parse the envelope first and fall back to the
    // raw status/body when the response is not the expected shape.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request.send().await.with_context(|| {
            format!(
                "Failed to reach the backend while {}. The backend service may be unavailable",
                what
            )
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read the backend response while {}", what))?;

        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                anyhow::bail!("Backend returned status {} while {}: {}", status, what, body)
            }
            Err(err) => Err(err)
                .with_context(|| format!("Failed to parse the backend response while {}", what)),
        }
    }
}
