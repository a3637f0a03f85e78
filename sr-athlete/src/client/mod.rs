//! HTTP client for services that feed meeting data into sr-athlete

use crate::models::{Athlete, ImportAthleteRequest, ImportTeamRequest, Team};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("sr-athlete-client/", env!("CARGO_PKG_VERSION"));

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Shared request plumbing
#[derive(Debug, Clone)]
struct Endpoint {
    http_client: reqwest::Client,
    base_url: Url,
}

impl Endpoint {
    fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn fail<T>(operation: &'static str, response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            operation,
            status,
            body,
        })
    }

    /// POST an import request; `true` in the result when the entity was created
    async fn import<B, T>(&self, operation: &'static str, path: &[&str], body: &B) -> Result<(T, bool), ClientError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        tracing::debug!(url = %url, "Posting import");

        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::CREATED => Ok((Self::read(response).await?, true)),
            StatusCode::OK => Ok((Self::read(response).await?, false)),
            _ => Self::fail(operation, response).await,
        }
    }
}

/// Athlete endpoints
#[derive(Debug, Clone)]
pub struct AthleteClient {
    endpoint: Endpoint,
}

impl AthleteClient {
    /// `base_url` like `http://athlete-service:8086/`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url)?,
        })
    }

    /// Athletes that took part in `meeting`; 404 yields an empty list
    pub async fn athletes_by_meeting(&self, meeting: &str) -> Result<Vec<Athlete>, ClientError> {
        let url = self.endpoint.url(&["athlete", "meet", meeting])?;
        tracing::debug!(url = %url, "Requesting athletes of meeting");

        let response = self
            .endpoint
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Endpoint::read(response).await,
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            _ => Endpoint::fail("athletes_by_meeting", response).await,
        }
    }

    /// Athlete by name and birth year; `None` on 404
    pub async fn athlete_by_name_and_year(
        &self,
        name: &str,
        year: i32,
    ) -> Result<Option<Athlete>, ClientError> {
        let url = self.endpoint.url(&["athlete", "name_year"])?;
        let year = year.to_string();

        let response = self
            .endpoint
            .http_client
            .get(url)
            .query(&[("name", name), ("year", year.as_str())])
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(Some(Endpoint::read(response).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Endpoint::fail("athlete_by_name_and_year", response).await,
        }
    }

    /// Import `athlete` as seen at `meeting`
    pub async fn import_athlete(
        &self,
        athlete: Athlete,
        meeting: &str,
    ) -> Result<(Athlete, bool), ClientError> {
        let request = ImportAthleteRequest {
            meeting: meeting.to_string(),
            athlete,
        };
        self.endpoint
            .import("import_athlete", &["athlete", "import"], &request)
            .await
    }
}

/// Team endpoints
#[derive(Debug, Clone)]
pub struct TeamClient {
    endpoint: Endpoint,
}

impl TeamClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url)?,
        })
    }

    /// Import `team` as seen at `meeting`
    pub async fn import_team(&self, team: Team, meeting: &str) -> Result<(Team, bool), ClientError> {
        let request = ImportTeamRequest {
            meeting: meeting.to_string(),
            team,
        };
        self.endpoint
            .import("import_team", &["team", "import"], &request)
            .await
    }
}
