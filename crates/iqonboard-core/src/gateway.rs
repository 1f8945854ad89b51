//! HTTP access to the inventory server's `/api/v2` endpoints.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;
use crate::model::{
    Application, Category, NewApplication, NewCategory, NewOrganization, Organization,
};
use crate::settings::{Credentials, OnboardSettings};

pub const APPLICATIONS_PATH: &str = "/api/v2/applications";
pub const ORGANIZATIONS_PATH: &str = "/api/v2/organizations";
pub const CATEGORIES_PATH: &str = "/api/v2/applicationCategories/organization";

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Typed read/create operations the reconciler needs from the inventory server.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    async fn list_categories(&self) -> GatewayResult<Vec<Category>>;
    async fn list_organizations(&self) -> GatewayResult<Vec<Organization>>;
    async fn list_applications(&self) -> GatewayResult<Vec<Application>>;

    async fn create_category(&self, category: &NewCategory) -> GatewayResult<Category>;
    async fn create_organization(&self, organization: &NewOrganization)
    -> GatewayResult<Organization>;
    async fn create_application(&self, application: &NewApplication)
    -> GatewayResult<Application>;
}

pub struct IqClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    root_organization_id: String,
}

impl IqClient {
    pub fn new(settings: &OnboardSettings) -> GatewayResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: settings.base_url.as_str().trim_end_matches('/').to_string(),
            credentials: settings.credentials.clone(),
            root_organization_id: settings.root_organization_id.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn categories_path(&self) -> String {
        format!("{CATEGORIES_PATH}/{}", self.root_organization_id)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header("Accept", "application/json")
    }

    /// GET `path`, unwrapping `root_key` from the body when present.
    pub async fn get(&self, path: &str, root_key: Option<&str>) -> GatewayResult<Value> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.request(reqwest::Method::GET, &url).send().await?;
        handle_response(resp, root_key).await
    }

    /// POST `body` as JSON to `path`, unwrapping `root_key` from the reply when present.
    pub async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
        root_key: Option<&str>,
    ) -> GatewayResult<Value> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(body)
            .send()
            .await?;
        handle_response(resp, root_key).await
    }
}

#[async_trait]
impl InventoryGateway for IqClient {
    async fn list_categories(&self) -> GatewayResult<Vec<Category>> {
        let value = self.get(&self.categories_path(), None).await?;
        decode(value)
    }

    async fn list_organizations(&self) -> GatewayResult<Vec<Organization>> {
        let value = self.get(ORGANIZATIONS_PATH, Some("organizations")).await?;
        decode(value)
    }

    async fn list_applications(&self) -> GatewayResult<Vec<Application>> {
        let value = self.get(APPLICATIONS_PATH, Some("applications")).await?;
        decode(value)
    }

    async fn create_category(&self, category: &NewCategory) -> GatewayResult<Category> {
        let value = self.post(&self.categories_path(), category, None).await?;
        decode(value)
    }

    async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> GatewayResult<Organization> {
        let value = self.post(ORGANIZATIONS_PATH, organization, None).await?;
        decode(value)
    }

    async fn create_application(
        &self,
        application: &NewApplication,
    ) -> GatewayResult<Application> {
        let value = self.post(APPLICATIONS_PATH, application, None).await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> GatewayResult<T> {
    Ok(serde_json::from_value(value)?)
}

async fn handle_response(
    resp: reqwest::Response,
    root_key: Option<&str>,
) -> GatewayResult<Value> {
    let status = resp.status();
    let body = resp.text().await?;

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound);
    }
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), %body, "request rejected");
        return Err(GatewayError::Remote {
            status: status.as_u16(),
            body,
        });
    }
    if body.trim().is_empty() {
        return Err(GatewayError::Empty);
    }

    let mut node: Value = serde_json::from_str(&body)?;
    if let Some(key) = root_key
        && let Some(inner) = node.get_mut(key)
    {
        node = inner.take();
    }
    if is_empty(&node) {
        return Err(GatewayError::Empty);
    }
    Ok(node)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
