//! Name → id resolution for the entities an application depends on.
//!
//! Both resolvers scan the snapshot first and only create on a miss. A created
//! entity is appended to the snapshot before returning, so later rows reuse it.

use crate::gateway::{GatewayResult, InventoryGateway};
use crate::matching::MatchMode;
use crate::model::{NewCategory, NewOrganization, TagRef};
use crate::settings::OnboardSettings;
use crate::snapshot::InventorySnapshot;

#[derive(Debug, Clone)]
pub struct ResolvePolicy {
    pub match_mode: MatchMode,
    pub category_color: String,
}

impl ResolvePolicy {
    pub fn from_settings(settings: &OnboardSettings) -> Self {
        Self {
            match_mode: settings.match_mode,
            category_color: settings.category_color.clone(),
        }
    }
}

/// Map a tag name to a category reference, creating the category when missing.
///
/// Returns `Ok(None)` for an empty name or when the server refuses the create;
/// the tag is then left off the application. A broken exchange is an `Err`.
pub async fn resolve_category<G: InventoryGateway + ?Sized>(
    gateway: &G,
    snapshot: &mut InventorySnapshot,
    policy: &ResolvePolicy,
    tag_name: &str,
) -> GatewayResult<Option<TagRef>> {
    if tag_name.is_empty() {
        return Ok(None);
    }
    if let Some(existing) = snapshot.find_category(tag_name, policy.match_mode) {
        tracing::debug!(tag = tag_name, category = %existing.name, "Matched existing category");
        return Ok(Some(TagRef::new(existing.id.clone())));
    }

    let payload = NewCategory {
        name: tag_name.to_string(),
        color: policy.category_color.clone(),
        description: tag_name.to_string(),
    };
    match gateway.create_category(&payload).await {
        Ok(category) => {
            tracing::info!(tag = tag_name, id = %category.id, "Created category");
            let tag = TagRef::new(category.id.clone());
            snapshot.append_category(category);
            Ok(Some(tag))
        }
        Err(err) if err.is_absence() => {
            tracing::warn!(tag = tag_name, error = %err, "Could not create category, dropping tag");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Map an organization name to its id, creating the organization when missing.
///
/// `Ok(None)` means the server refused the create; the caller must not create
/// an application without an organization.
pub async fn resolve_organization<G: InventoryGateway + ?Sized>(
    gateway: &G,
    snapshot: &mut InventorySnapshot,
    policy: &ResolvePolicy,
    org_name: &str,
) -> GatewayResult<Option<String>> {
    if let Some(existing) = snapshot.find_organization(org_name, policy.match_mode) {
        return Ok(Some(existing.id.clone()));
    }

    let payload = NewOrganization {
        name: org_name.to_string(),
    };
    match gateway.create_organization(&payload).await {
        Ok(organization) => {
            tracing::info!(organization = org_name, id = %organization.id, "Created organization");
            let id = organization.id.clone();
            snapshot.append_organization(organization);
            Ok(Some(id))
        }
        Err(err) if err.is_absence() => {
            tracing::warn!(organization = org_name, error = %err, "Could not create organization");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
