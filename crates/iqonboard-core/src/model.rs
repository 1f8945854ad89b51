//! Inventory entities as exchanged with the `/api/v2` endpoints.
//!
//! Read models tolerate extra fields the server sends; creation payloads are
//! separate types so a request never carries a server-assigned `id`.

use serde::{Deserialize, Serialize};

/// Application category ("tag") defined under the root organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// Reference to a category attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRef {
    pub tag_id: String,
}

impl TagRef {
    pub fn new(tag_id: impl Into<String>) -> Self {
        Self {
            tag_id: tag_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub public_id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub application_tags: Vec<TagRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub public_id: String,
    pub name: String,
    pub organization_id: String,
    pub application_tags: Vec<TagRef>,
}

/// One desired application, as read from the import file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRow {
    /// 1-based line in the import file (header is line 1).
    pub line: u64,
    pub organization_name: String,
    pub public_id: String,
    pub name: String,
    pub application_tags: Vec<String>,
}
