//! Reconciliation driver: walks import rows and creates missing applications.
//!
//! Rows are processed strictly one after another. For each row the
//! organization and categories are resolved before the application create is
//! issued, so every reference in the payload already exists remotely.
//!
//! Nothing here aborts the batch. Each row ends in exactly one [`RowOutcome`];
//! the only run-level error is failing to load the snapshot in
//! [`Reconciler::load`].

use std::fmt;

use crate::error::{GatewayError, OnboardError, Result};
use crate::gateway::InventoryGateway;
use crate::model::{ImportRow, NewApplication};
use crate::resolve::{ResolvePolicy, resolve_category, resolve_organization};
use crate::settings::OnboardSettings;
use crate::snapshot::InventorySnapshot;

/// What happened to one import row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Added {
        line: u64,
        public_id: String,
        organization_name: String,
        application_id: String,
    },
    /// An application with this publicId already exists.
    SkippedExisting {
        line: u64,
        public_id: String,
        application_id: String,
    },
    /// Another application already uses the desired name.
    SkippedNameTaken {
        line: u64,
        public_id: String,
        name: String,
        holder_public_id: String,
    },
    /// The organization neither existed nor could be created.
    SkippedUnresolvedOrganization {
        line: u64,
        public_id: String,
        organization_name: String,
    },
    Failed {
        line: u64,
        public_id: String,
        reason: String,
    },
    /// The server accepted the create but its response could not be decoded.
    /// The application most likely exists remotely.
    Unconfirmed {
        line: u64,
        public_id: String,
        reason: String,
    },
    /// The CSV record itself could not be decoded.
    Unreadable { line: u64, reason: String },
}

impl RowOutcome {
    pub fn line(&self) -> u64 {
        match self {
            Self::Added { line, .. }
            | Self::SkippedExisting { line, .. }
            | Self::SkippedNameTaken { line, .. }
            | Self::SkippedUnresolvedOrganization { line, .. }
            | Self::Failed { line, .. }
            | Self::Unconfirmed { line, .. }
            | Self::Unreadable { line, .. } => *line,
        }
    }

    pub fn public_id(&self) -> Option<&str> {
        match self {
            Self::Added { public_id, .. }
            | Self::SkippedExisting { public_id, .. }
            | Self::SkippedNameTaken { public_id, .. }
            | Self::SkippedUnresolvedOrganization { public_id, .. }
            | Self::Failed { public_id, .. }
            | Self::Unconfirmed { public_id, .. } => Some(public_id),
            Self::Unreadable { .. } => None,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::SkippedExisting { .. }
                | Self::SkippedNameTaken { .. }
                | Self::SkippedUnresolvedOrganization { .. }
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            Self::Failed { .. } | Self::Unconfirmed { .. } | Self::Unreadable { .. }
        )
    }
}

impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added {
                public_id,
                organization_name,
                application_id,
                ..
            } => write!(f, "added {public_id} to {organization_name}: {application_id}"),
            Self::SkippedExisting { public_id, .. } => {
                write!(f, "skipping {public_id}: already onboarded")
            }
            Self::SkippedNameTaken {
                public_id,
                name,
                holder_public_id,
                ..
            } => write!(
                f,
                "skipping {public_id}: name \"{name}\" is already used by {holder_public_id}"
            ),
            Self::SkippedUnresolvedOrganization {
                public_id,
                organization_name,
                ..
            } => write!(
                f,
                "skipping {public_id}: organization \"{organization_name}\" could not be resolved"
            ),
            Self::Failed {
                public_id, reason, ..
            } => write!(f, "failed {public_id}: {reason}"),
            Self::Unconfirmed {
                public_id, reason, ..
            } => write!(
                f,
                "created {public_id} but the response was unreadable, verify it on the server: {reason}"
            ),
            Self::Unreadable { reason, .. } => write!(f, "unreadable row: {reason}"),
        }
    }
}

/// Counts over every row of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub rows: usize,
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn record(&mut self, outcome: &RowOutcome) {
        self.rows += 1;
        if outcome.is_added() {
            self.added += 1;
        } else if outcome.is_skipped() {
            self.skipped += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Owns the gateway and the snapshot for one run.
pub struct Reconciler<G> {
    gateway: G,
    snapshot: InventorySnapshot,
    policy: ResolvePolicy,
    default_organization: String,
}

impl<G: InventoryGateway> Reconciler<G> {
    pub fn new(gateway: G, snapshot: InventorySnapshot, settings: &OnboardSettings) -> Self {
        Self {
            gateway,
            snapshot,
            policy: ResolvePolicy::from_settings(settings),
            default_organization: settings.default_organization.clone(),
        }
    }

    /// Fetch a fresh snapshot through `gateway` and build a reconciler on it.
    pub async fn load(gateway: G, settings: &OnboardSettings) -> Result<Self> {
        let snapshot = InventorySnapshot::load(&gateway).await?;
        Ok(Self::new(gateway, snapshot, settings))
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Process every row in order, handing each outcome to `on_row` as soon
    /// as it is known.
    pub async fn run<I, F>(&mut self, rows: I, mut on_row: F) -> ReconcileReport
    where
        I: IntoIterator<Item = Result<ImportRow>>,
        F: FnMut(&RowOutcome),
    {
        let mut report = ReconcileReport::default();
        for row in rows {
            let outcome = match row {
                Ok(row) => self.process_row(row).await,
                Err(err) => unreadable(err),
            };
            tracing::debug!(
                line = outcome.line(),
                public_id = outcome.public_id().unwrap_or_default(),
                outcome = %outcome,
                "Row processed"
            );
            report.record(&outcome);
            on_row(&outcome);
        }
        tracing::info!(
            rows = report.rows,
            added = report.added,
            skipped = report.skipped,
            failed = report.failed,
            "Reconciliation finished"
        );
        report
    }

    pub async fn process_row(&mut self, mut row: ImportRow) -> RowOutcome {
        if row.public_id.is_empty() {
            tracing::warn!(line = row.line, ?row, "Row has no publicId");
        }
        self.apply_defaults(&mut row);

        if let Some(existing) = self.snapshot.find_application(&row.public_id) {
            tracing::info!(public_id = %row.public_id, id = %existing.id, "Application exists, skipping");
            return RowOutcome::SkippedExisting {
                line: row.line,
                public_id: row.public_id,
                application_id: existing.id.clone(),
            };
        }

        if let Some(holder) = self.snapshot.application_named(&row.name) {
            tracing::warn!(
                public_id = %row.public_id,
                name = %row.name,
                holder = %holder.public_id,
                "Application name already in use, skipping"
            );
            return RowOutcome::SkippedNameTaken {
                line: row.line,
                public_id: row.public_id,
                name: row.name,
                holder_public_id: holder.public_id.clone(),
            };
        }

        match self.create_application(&row).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(public_id = %row.public_id, error = %err, "Application not created");
                RowOutcome::Failed {
                    line: row.line,
                    public_id: row.public_id,
                    reason: err.to_string(),
                }
            }
        }
    }

    fn apply_defaults(&self, row: &mut ImportRow) {
        if row.name.is_empty() {
            row.name = row.public_id.clone();
        }
        if row.organization_name.is_empty() {
            row.organization_name = self.default_organization.clone();
        }
    }

    /// Resolve dependencies, then create. Absence on the final create is a
    /// `Failed` outcome and an undecodable 2xx answer is `Unconfirmed`; any
    /// other broken exchange is an `Err`.
    async fn create_application(
        &mut self,
        row: &ImportRow,
    ) -> std::result::Result<RowOutcome, GatewayError> {
        let Some(organization_id) = resolve_organization(
            &self.gateway,
            &mut self.snapshot,
            &self.policy,
            &row.organization_name,
        )
        .await?
        else {
            tracing::warn!(
                public_id = %row.public_id,
                organization = %row.organization_name,
                "Organization unresolved, application not created"
            );
            return Ok(RowOutcome::SkippedUnresolvedOrganization {
                line: row.line,
                public_id: row.public_id.clone(),
                organization_name: row.organization_name.clone(),
            });
        };

        let mut application_tags = Vec::with_capacity(row.application_tags.len());
        for tag in &row.application_tags {
            if let Some(tag_ref) =
                resolve_category(&self.gateway, &mut self.snapshot, &self.policy, tag).await?
            {
                application_tags.push(tag_ref);
            }
        }

        let payload = NewApplication {
            public_id: row.public_id.clone(),
            name: row.name.clone(),
            organization_id,
            application_tags,
        };
        match self.gateway.create_application(&payload).await {
            Ok(application) => {
                tracing::info!(
                    public_id = %row.public_id,
                    organization = %row.organization_name,
                    id = %application.id,
                    "Application added"
                );
                let outcome = RowOutcome::Added {
                    line: row.line,
                    public_id: row.public_id.clone(),
                    organization_name: row.organization_name.clone(),
                    application_id: application.id.clone(),
                };
                self.snapshot.append_application(application);
                Ok(outcome)
            }
            Err(err @ GatewayError::Decode(_)) => {
                tracing::error!(
                    public_id = %row.public_id,
                    error = %err,
                    "Application created but response unreadable"
                );
                Ok(RowOutcome::Unconfirmed {
                    line: row.line,
                    public_id: row.public_id.clone(),
                    reason: err.to_string(),
                })
            }
            Err(err) if err.is_absence() => {
                tracing::error!(public_id = %row.public_id, error = %err, "Application create refused");
                Ok(RowOutcome::Failed {
                    line: row.line,
                    public_id: row.public_id.clone(),
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }
}

fn unreadable(err: OnboardError) -> RowOutcome {
    let line = match &err {
        OnboardError::MalformedRow { line, .. } => *line,
        _ => 0,
    };
    tracing::error!(line, error = %err, "Skipping unreadable row");
    RowOutcome::Unreadable {
        line,
        reason: err.to_string(),
    }
}
