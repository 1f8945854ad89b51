//! Resolved run configuration shared by the gateway and the reconciler.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{OnboardError, Result};
use crate::matching::MatchMode;

pub const DEFAULT_URL: &str = "http://localhost:8070";
pub const DEFAULT_AUTH: &str = "admin:admin123";
pub const DEFAULT_IMPORT_FILE: &str = "sample_import.csv";
pub const DEFAULT_ORGANIZATION: &str = "Sandbox Organization";
pub const ROOT_ORGANIZATION_ID: &str = "ROOT_ORGANIZATION_ID";
pub const DEFAULT_CATEGORY_COLOR: &str = "dark-blue";

/// Basic-auth credentials parsed from `user:password`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Splits on the first `:` so passwords may contain colons.
    pub fn parse(raw: &str) -> Result<Self> {
        let (username, password) = raw
            .split_once(':')
            .ok_or(OnboardError::InvalidCredentials)?;
        if username.is_empty() {
            return Err(OnboardError::InvalidCredentials);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct OnboardSettings {
    pub base_url: Url,
    pub credentials: Credentials,
    pub import_file: PathBuf,
    pub default_organization: String,
    pub match_mode: MatchMode,
    pub root_organization_id: String,
    pub category_color: String,
    pub timeout: Option<Duration>,
}

impl OnboardSettings {
    pub fn new(base_url: &str, auth: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            credentials: Credentials::parse(auth)?,
            import_file: PathBuf::from(DEFAULT_IMPORT_FILE),
            default_organization: DEFAULT_ORGANIZATION.to_string(),
            match_mode: MatchMode::default(),
            root_organization_id: ROOT_ORGANIZATION_ID.to_string(),
            category_color: DEFAULT_CATEGORY_COLOR.to_string(),
            timeout: None,
        })
    }

    pub fn with_import_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_file = path.into();
        self
    }

    pub fn with_default_organization(mut self, name: impl Into<String>) -> Self {
        self.default_organization = name.into();
        self
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim_end_matches('/'))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(OnboardError::configuration(format!(
            "Unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    Ok(url)
}
