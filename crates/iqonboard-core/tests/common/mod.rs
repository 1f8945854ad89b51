//! In-memory inventory server for reconciliation tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use iqonboard_core::{
    Application, Category, GatewayError, GatewayResult, ImportReader, ImportRow, InventoryGateway,
    NewApplication, NewCategory, NewOrganization, OnboardSettings, Organization,
};

#[derive(Debug, Default)]
pub struct RemoteState {
    pub categories: Vec<Category>,
    pub organizations: Vec<Organization>,
    pub applications: Vec<Application>,
    /// Names whose create is refused with a 400.
    pub refuse: Vec<String>,
    /// Names whose application create succeeds but answers with an undecodable body.
    pub garble: Vec<String>,
    pub category_creates: Vec<NewCategory>,
    pub organization_creates: Vec<NewOrganization>,
    pub application_creates: Vec<NewApplication>,
    /// For every application create: were all references known remotely at that moment?
    pub references_valid: Vec<bool>,
    next_id: u32,
}

impl RemoteState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn refused(&self, name: &str) -> GatewayResult<()> {
        if self.refuse.iter().any(|r| r == name) {
            return Err(GatewayError::Remote {
                status: 400,
                body: format!("refused {name}"),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeGateway {
    pub state: Mutex<RemoteState>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().categories.push(Category {
            id: id.into(),
            name: name.into(),
            color: "dark-blue".into(),
            description: name.into(),
        });
        self
    }

    pub fn with_organization(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().organizations.push(Organization {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_application(self, id: &str, public_id: &str, name: &str) -> Self {
        self.state.lock().unwrap().applications.push(Application {
            id: id.into(),
            public_id: public_id.into(),
            name: name.into(),
            organization_id: String::new(),
            application_tags: Vec::new(),
        });
        self
    }

    pub fn refusing(self, name: &str) -> Self {
        self.state.lock().unwrap().refuse.push(name.into());
        self
    }

    pub fn garbling(self, name: &str) -> Self {
        self.state.lock().unwrap().garble.push(name.into());
        self
    }

    pub fn application_creates(&self) -> Vec<NewApplication> {
        self.state.lock().unwrap().application_creates.clone()
    }

    pub fn category_creates(&self) -> Vec<NewCategory> {
        self.state.lock().unwrap().category_creates.clone()
    }

    pub fn organization_creates(&self) -> Vec<NewOrganization> {
        self.state.lock().unwrap().organization_creates.clone()
    }
}

#[async_trait]
impl InventoryGateway for FakeGateway {
    async fn list_categories(&self) -> GatewayResult<Vec<Category>> {
        let state = self.state.lock().unwrap();
        if state.categories.is_empty() {
            return Err(GatewayError::Empty);
        }
        Ok(state.categories.clone())
    }

    async fn list_organizations(&self) -> GatewayResult<Vec<Organization>> {
        let state = self.state.lock().unwrap();
        if state.organizations.is_empty() {
            return Err(GatewayError::Empty);
        }
        Ok(state.organizations.clone())
    }

    async fn list_applications(&self) -> GatewayResult<Vec<Application>> {
        let state = self.state.lock().unwrap();
        if state.applications.is_empty() {
            return Err(GatewayError::Empty);
        }
        Ok(state.applications.clone())
    }

    async fn create_category(&self, category: &NewCategory) -> GatewayResult<Category> {
        let mut state = self.state.lock().unwrap();
        state.category_creates.push(category.clone());
        state.refused(&category.name)?;
        let created = Category {
            id: state.next_id("cat"),
            name: category.name.clone(),
            color: category.color.clone(),
            description: category.description.clone(),
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> GatewayResult<Organization> {
        let mut state = self.state.lock().unwrap();
        state.organization_creates.push(organization.clone());
        state.refused(&organization.name)?;
        let created = Organization {
            id: state.next_id("org"),
            name: organization.name.clone(),
        };
        state.organizations.push(created.clone());
        Ok(created)
    }

    async fn create_application(
        &self,
        application: &NewApplication,
    ) -> GatewayResult<Application> {
        let mut state = self.state.lock().unwrap();
        state.application_creates.push(application.clone());

        let org_known = state
            .organizations
            .iter()
            .any(|o| o.id == application.organization_id);
        let tags_known = application
            .application_tags
            .iter()
            .all(|t| state.categories.iter().any(|c| c.id == t.tag_id));
        state.references_valid.push(org_known && tags_known);

        state.refused(&application.name)?;
        let created = Application {
            id: state.next_id("app"),
            public_id: application.public_id.clone(),
            name: application.name.clone(),
            organization_id: application.organization_id.clone(),
            application_tags: application.application_tags.clone(),
        };
        state.applications.push(created.clone());
        if state.garble.iter().any(|g| *g == application.name) {
            let err = serde_json::from_str::<Application>("<html>ok</html>").unwrap_err();
            return Err(GatewayError::Decode(err));
        }
        Ok(created)
    }
}

pub fn settings() -> OnboardSettings {
    OnboardSettings::new("http://localhost:8070", "admin:admin123").unwrap()
}

pub const HEADER: &str = "organizationName,publicId,name,applicationTags\n";

pub fn rows(body: &str) -> Vec<iqonboard_core::Result<ImportRow>> {
    let csv = format!("{HEADER}{body}");
    ImportReader::from_reader(std::io::Cursor::new(csv))
        .unwrap()
        .rows()
        .collect()
}
