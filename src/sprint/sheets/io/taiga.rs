use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::sprint::sheets::config::TaigaCredentials;
use crate::sprint::sheets::error::{Result, SyncError};
use crate::sprint::sheets::model::{self, Milestone, Project, ProjectStats};
use crate::sprint::sheets::retry::{RetryPolicy, check_status};

pub const AUTH_ENDPOINT: &str = "/api/v1/auth";
pub const PROJECTS_ENDPOINT: &str = "/api/v1/projects";
pub const MILESTONES_ENDPOINT: &str = model::MILESTONES_ENDPOINT;

/// Asks the tracker to return whole collections instead of the first page.
const DISABLE_PAGINATION: &str = "x-disable-pagination";

#[derive(Deserialize)]
struct AuthResponse {
    auth_token: Option<String>,
}

/// Read-only client for the task tracker REST API.
pub struct TaigaClient {
    http: Client,
    host: String,
    token: String,
    retry: RetryPolicy,
}

impl TaigaClient {
    /// Authenticates with the given credentials and returns a ready client.
    pub fn connect(credentials: &TaigaCredentials, retry: RetryPolicy) -> Result<Self> {
        let http = Client::builder().build()?;
        let token = authenticate(&http, credentials, &retry)?;
        Ok(Self {
            http,
            host: credentials.host.clone(),
            token,
            retry,
        })
    }

    /// Fetches every project visible to the authenticated user.
    #[instrument(level = "debug", skip_all, fields(host = %self.host))]
    pub fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.get(PROJECTS_ENDPOINT)
    }

    /// Fetches every milestone, including the embedded user stories.
    #[instrument(level = "debug", skip_all, fields(host = %self.host))]
    pub fn fetch_milestones(&self) -> Result<Vec<Milestone>> {
        self.get(MILESTONES_ENDPOINT)
    }

    /// Fetches projects and milestones and aggregates completed points per
    /// sprint and assignee.
    #[instrument(level = "info", skip_all, fields(host = %self.host))]
    pub fn compute_stats(&self) -> Result<Vec<ProjectStats>> {
        let milestones = self.fetch_milestones()?;
        let projects = self.fetch_projects()?;
        info!(
            project_count = projects.len(),
            milestone_count = milestones.len(),
            "fetched tracker data"
        );
        model::aggregate(&projects, &milestones)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{endpoint}", self.host);
        let body = self.retry.run(endpoint, || {
            let response = self
                .http
                .get(&url)
                .header(CONTENT_TYPE, "application/json")
                .header(AUTHORIZATION, format!("Bearer {}", self.token))
                .header(DISABLE_PAGINATION, "True")
                .send()?;
            Ok(check_status(response)?.text()?)
        })?;
        debug!(endpoint, bytes = body.len(), "received response");
        serde_json::from_str(&body).map_err(|error| SyncError::malformed(endpoint, error.to_string()))
    }
}

/// Exchanges username and password for a bearer token.
#[instrument(level = "info", skip_all, fields(host = %credentials.host, user = %credentials.username))]
pub fn authenticate(
    http: &Client,
    credentials: &TaigaCredentials,
    retry: &RetryPolicy,
) -> Result<String> {
    let url = format!("{}{AUTH_ENDPOINT}", credentials.host);
    let payload = json!({
        "username": credentials.username,
        "password": credentials.password,
        "type": "normal",
    });

    let body = retry
        .run(AUTH_ENDPOINT, || {
            let response = http
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .json(&payload)
                .send()?;
            Ok(check_status(response)?.text()?)
        })
        .map_err(|error| SyncError::Auth(error.to_string()))?;

    let response: AuthResponse = serde_json::from_str(&body)
        .map_err(|error| SyncError::Auth(format!("unexpected auth response: {error}")))?;
    let token = response
        .auth_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| SyncError::Auth("response carried no auth_token".into()))?;
    info!("authenticated against task tracker");
    Ok(token)
}
