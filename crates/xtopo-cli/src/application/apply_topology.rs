//! ApplyTopologyUseCase: loads a document, reconciles it, persists the result.
//!
//! The entry point is [`run`]: load the configuration (an absent file starts
//! from an empty document, so a populate request can bootstrap a machine's
//! first config), hand it to [`reconcile::apply`] together with whatever
//! [`DeviceInventory`] the caller selected, then write the result back.
//!
//! Failures never write: a reconciliation error aborts before the save, and a
//! dry run skips the save on purpose. The returned [`ApplySummary`] carries
//! the section counts seen on entry and exit so the binary can report what
//! actually changed.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;
use xtopo_core::inventory::DeviceInventory;
use xtopo_core::reconcile::{self, ReconcileError, TopologyRequest};
use xtopo_core::ConfigDocument;

use crate::infrastructure::document_store::{self, DocumentStoreError};

/// Error type for the apply-topology use case.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("document store failure: {0}")]
    Store(#[from] DocumentStoreError),
    #[error("reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),
}

/// Where the document comes from and where the result goes.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Configuration file to reconcile.
    pub config: PathBuf,
    /// Write the result here instead of back over `config`.
    pub output: Option<PathBuf>,
    /// Reconcile and report, but write nothing.
    pub dry_run: bool,
}

/// Section counts of one document, for before/after reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyCounts {
    pub screens: usize,
    pub devices: usize,
    pub monitors: usize,
    pub adjacencies: usize,
}

impl TopologyCounts {
    pub fn of(document: &ConfigDocument) -> Self {
        Self {
            screens: document.screens.len(),
            devices: document.devices.len(),
            monitors: document.monitors.len(),
            adjacencies: document.layout.adjacencies.len(),
        }
    }
}

/// What one run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    /// Counts when the document was loaded.
    pub before: TopologyCounts,
    /// Counts after reconciliation.
    pub after: TopologyCounts,
    /// Where the result was written; `None` for dry runs.
    pub saved_to: Option<PathBuf>,
}

/// Loads, reconciles, and saves the document named by `options`.
///
/// # Errors
///
/// Returns [`ApplyError::Store`] when the document cannot be loaded or saved
/// and [`ApplyError::Reconcile`] when a transformation fails. A failed run
/// writes no file.
pub fn run(
    inventory: &dyn DeviceInventory,
    options: &ApplyOptions,
    request: &TopologyRequest,
) -> Result<ApplySummary, ApplyError> {
    let mut document = document_store::load_or_default(&options.config)?;
    let before = TopologyCounts::of(&document);

    reconcile::apply(&mut document, inventory, request)?;
    let after = TopologyCounts::of(&document);

    let saved_to = if options.dry_run {
        None
    } else {
        let target = options.output.as_ref().unwrap_or(&options.config);
        document_store::save(target, &document)?;
        Some(target.clone())
    };

    info!(
        screens_before = before.screens,
        screens_after = after.screens,
        devices = after.devices,
        monitors = after.monitors,
        adjacencies = after.adjacencies,
        dry_run = options.dry_run,
        "topology applied"
    );

    Ok(ApplySummary { before, after, saved_to })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
