//! In-memory copy of the remote inventory for the duration of one run.
//!
//! The snapshot is fetched once and afterwards only grows: every entity the
//! run creates is appended here instead of re-reading the server. Two rows
//! asking for the same new organization therefore see the first row's result.

use indexmap::IndexMap;

use crate::error::{GatewayError, OnboardError, Result};
use crate::gateway::{GatewayResult, InventoryGateway};
use crate::matching::MatchMode;
use crate::model::{Application, Category, Organization};

#[derive(Debug, Default, Clone)]
pub struct InventorySnapshot {
    categories: IndexMap<String, Category>,
    organizations: IndexMap<String, Organization>,
    applications: IndexMap<String, Application>,
}

impl InventorySnapshot {
    /// Read categories (root scope), organizations and applications.
    ///
    /// An absent or empty listing becomes an empty view. A broken exchange
    /// aborts, since treating an unreachable server as empty would attempt to
    /// recreate everything.
    pub async fn load<G: InventoryGateway + ?Sized>(gateway: &G) -> Result<Self> {
        let categories = view("categories", gateway.list_categories().await)?;
        let organizations = view("organizations", gateway.list_organizations().await)?;
        let applications = view("applications", gateway.list_applications().await)?;

        tracing::info!(
            categories = categories.len(),
            organizations = organizations.len(),
            applications = applications.len(),
            "Loaded inventory snapshot"
        );

        Ok(Self::from_parts(categories, organizations, applications))
    }

    pub fn from_parts(
        categories: Vec<Category>,
        organizations: Vec<Organization>,
        applications: Vec<Application>,
    ) -> Self {
        let mut snapshot = Self::default();
        categories.into_iter().for_each(|c| snapshot.append_category(c));
        organizations
            .into_iter()
            .for_each(|o| snapshot.append_organization(o));
        applications
            .into_iter()
            .for_each(|a| snapshot.append_application(a));
        snapshot
    }

    pub fn categories(&self) -> impl ExactSizeIterator<Item = &Category> {
        self.categories.values()
    }

    pub fn organizations(&self) -> impl ExactSizeIterator<Item = &Organization> {
        self.organizations.values()
    }

    pub fn applications(&self) -> impl ExactSizeIterator<Item = &Application> {
        self.applications.values()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.organizations.get(id)
    }

    pub fn append_category(&mut self, category: Category) {
        self.categories.insert(category.id.clone(), category);
    }

    pub fn append_organization(&mut self, organization: Organization) {
        self.organizations
            .insert(organization.id.clone(), organization);
    }

    pub fn append_application(&mut self, application: Application) {
        self.applications
            .insert(application.id.clone(), application);
    }

    /// First category, in snapshot order, whose name matches `name`.
    pub fn find_category(&self, name: &str, mode: MatchMode) -> Option<&Category> {
        self.categories().find(|c| mode.matches(&c.name, name))
    }

    /// First organization, in snapshot order, whose name matches `name`.
    pub fn find_organization(&self, name: &str, mode: MatchMode) -> Option<&Organization> {
        self.organizations().find(|o| mode.matches(&o.name, name))
    }

    pub fn find_application(&self, public_id: &str) -> Option<&Application> {
        self.applications().find(|a| a.public_id == public_id)
    }

    pub fn application_named(&self, name: &str) -> Option<&Application> {
        self.applications().find(|a| a.name == name)
    }
}

fn view<T>(kind: &str, listing: GatewayResult<Vec<T>>) -> Result<Vec<T>> {
    match listing {
        Ok(items) => Ok(items),
        Err(GatewayError::NotFound | GatewayError::Empty) => {
            tracing::info!(kind, "No existing {kind} found");
            Ok(Vec::new())
        }
        Err(err @ GatewayError::Remote { .. }) => {
            tracing::warn!(kind, error = %err, "Failed to read {kind}, continuing with none");
            Ok(Vec::new())
        }
        Err(err) => Err(OnboardError::Snapshot(err)),
    }
}
