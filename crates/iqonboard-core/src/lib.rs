//! Idempotent onboarding of applications into an inventory server.
//!
//! A run reads a CSV of desired applications, loads a snapshot of the remote
//! categories, organizations and applications, and creates only what is
//! missing. Organizations and categories an application refers to are
//! resolved (and created if needed) before the application itself.
//!
//! # Components
//!
//! - [`ImportReader`] - validates the CSV header and yields [`ImportRow`]s
//! - [`InventoryGateway`] / [`IqClient`] - read and create calls against `/api/v2`
//! - [`InventorySnapshot`] - the run's in-memory view of the remote state
//! - [`Reconciler`] - the per-row driver producing [`RowOutcome`]s
//!
//! # Example
//!
//! ```ignore
//! use iqonboard_core::{ImportReader, IqClient, OnboardSettings, Reconciler};
//!
//! let settings = OnboardSettings::new("http://localhost:8070", "admin:admin123")?;
//! let rows = ImportReader::open(&settings.import_file)?.rows();
//! let mut reconciler = Reconciler::load(IqClient::new(&settings)?, &settings).await?;
//! let report = reconciler.run(rows, |outcome| println!("{outcome}")).await;
//! ```

pub mod error;
pub mod gateway;
pub mod loader;
pub mod matching;
pub mod model;
pub mod reconcile;
pub mod resolve;
pub mod settings;
pub mod snapshot;

pub use error::{GatewayError, OnboardError, Result};
pub use gateway::{GatewayResult, InventoryGateway, IqClient};
pub use loader::{ImportReader, ImportRows, REQUIRED_COLUMNS};
pub use matching::MatchMode;
pub use model::{
    Application, Category, ImportRow, NewApplication, NewCategory, NewOrganization, Organization,
    TagRef,
};
pub use reconcile::{ReconcileReport, Reconciler, RowOutcome};
pub use settings::{Credentials, OnboardSettings};
pub use snapshot::InventorySnapshot;
