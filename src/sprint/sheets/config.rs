use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::sprint::sheets::error::{Result, SyncError};

/// Default location of the task tracker credentials.
pub const DEFAULT_TAIGA_CREDS: &str = "taiga_login.json";

/// Default location of the spreadsheet service-account key.
pub const DEFAULT_GSHEETS_CREDS: &str = "gsheets_login.json";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Contents of the task tracker credentials file.
#[derive(Clone, Deserialize)]
pub struct TaigaCredentials {
    /// Base URL of the tracker, without the `/api/v1` suffix.
    pub host: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for TaigaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaigaCredentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl TaigaCredentials {
    pub fn load(path: &Path) -> Result<Self> {
        let mut creds: Self = load_json(path)?;
        creds.host = creds.host.trim_end_matches('/').to_string();
        if creds.host.is_empty() {
            return Err(SyncError::Credentials {
                path: path.to_path_buf(),
                reason: "'host' must not be empty".into(),
            });
        }
        Ok(creds)
    }
}

/// The subset of a service-account key file needed for the JWT bearer grant.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PKCS#8 private key in PEM form.
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|error| SyncError::Credentials {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;
    serde_json::from_str(&data).map_err(|error| SyncError::Credentials {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })
}
