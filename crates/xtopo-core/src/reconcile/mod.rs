//! Topology reconciliation engine.
//!
//! Four transformations rewrite a [`ConfigDocument`] to match a requested GPU
//! topology:
//!
//! - **populate** ([`enable_all_gpus`]) — rebuild the whole topology from the
//!   device inventory, one screen per GPU.
//! - **split** ([`enable_separate_screens`]) — give a GPU's second output its
//!   own screen by cloning the screen/device pair.
//! - **merge** ([`disable_separate_screens`]) — collapse screens that share a
//!   physical GPU back into one.
//! - **restrict** ([`only_one_screen`]) — keep only the first screen.
//!
//! Every transformation ends by regenerating the layout's adjacency list from
//! the screen sequence and, where screens can disappear, collecting orphaned
//! device/monitor sections. Fallible lookups (inventory fetch, named-screen
//! resolution) run before the first structural mutation, so an error always
//! means the document was left as it was.
//!
//! [`apply`] runs the requested transformations as a fixed pipeline; the
//! ordering contract lives in [`TopologyRequest::steps`].

pub mod adjacency;
pub mod merge;
pub mod orphans;
pub mod populate;
pub mod restrict;
pub mod split;

use thiserror::Error;
use tracing::debug;

use crate::busid::BusId;
use crate::document::{ConfigDocument, Device, Screen, SectionList};
use crate::inventory::{DeviceInventory, InventoryError};

pub use adjacency::rebuild_adjacencies;
pub use merge::disable_separate_screens;
pub use orphans::collect_orphans;
pub use populate::enable_all_gpus;
pub use restrict::only_one_screen;
pub use split::enable_separate_screens;

/// Name of the global flag that makes the server span one desktop across all
/// screens.
pub const XINERAMA_OPTION: &str = "Xinerama";

/// Errors that can abort a topology transformation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The device inventory could not provide any GPUs.
    #[error("cannot query GPUs: {0}")]
    InventoryUnavailable(#[from] InventoryError),

    /// The screen named as the transformation target does not exist.
    #[error("screen '{name}' not found")]
    ScreenNotFound { name: String },

    /// The operation needs at least one screen and found none.
    #[error("no screens present in the layout")]
    NoScreens,
}

/// What the caller asked for. Unset fields mean "leave that aspect alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyRequest {
    /// Rebuild the topology with one screen per detected GPU.
    pub enable_all_gpus: bool,
    /// `Some(true)` splits per-GPU outputs into separate screens,
    /// `Some(false)` merges them back.
    pub separate_screens: Option<bool>,
    /// Restrict split/merge to this screen instead of the whole layout.
    pub screen: Option<String>,
    /// Set the global `Xinerama` flag on or off.
    pub xinerama: Option<bool>,
    /// Collapse the layout to its first screen.
    pub only_one_screen: bool,
}

impl TopologyRequest {
    /// Expands the request into the pipeline steps [`apply`] will run.
    ///
    /// The order is fixed and load-bearing: populate replaces the whole
    /// topology so it must come first, and restrict is a deliberate final
    /// collapse so it comes last.
    pub fn steps(&self) -> Vec<PipelineStep> {
        let mut steps = Vec::new();
        if self.enable_all_gpus {
            steps.push(PipelineStep::EnableAllGpus);
        }
        if let Some(enable) = self.separate_screens {
            steps.push(PipelineStep::Separate { enable });
        }
        if let Some(enable) = self.xinerama {
            steps.push(PipelineStep::SetXinerama { enable });
        }
        if self.only_one_screen {
            steps.push(PipelineStep::OnlyOneScreen);
        }
        steps
    }

    /// `true` when the request asks for nothing at all.
    pub fn is_empty(&self) -> bool {
        self.steps().is_empty()
    }
}

/// One step of the reconciliation pipeline, in the order [`apply`] runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    EnableAllGpus,
    Separate { enable: bool },
    SetXinerama { enable: bool },
    OnlyOneScreen,
}

/// Applies every requested transformation to `document`, in pipeline order.
///
/// The first failing step aborts the remainder. Steps that already ran are
/// not rolled back, so a failed multi-step request can leave the document
/// partially transformed; each individual step, however, only mutates after
/// its own preconditions have been resolved.
///
/// # Errors
///
/// Propagates the first [`ReconcileError`] produced by a step.
pub fn apply(
    document: &mut ConfigDocument,
    inventory: &dyn DeviceInventory,
    request: &TopologyRequest,
) -> Result<(), ReconcileError> {
    for step in request.steps() {
        debug!(?step, "applying topology step");
        match step {
            PipelineStep::EnableAllGpus => enable_all_gpus(document, inventory)?,
            PipelineStep::Separate { enable: true } => {
                enable_separate_screens(document, inventory, request.screen.as_deref())?
            }
            PipelineStep::Separate { enable: false } => {
                disable_separate_screens(document, request.screen.as_deref())?
            }
            PipelineStep::SetXinerama { enable } => {
                document.set_boolean_flag(XINERAMA_OPTION, enable)
            }
            PipelineStep::OnlyOneScreen => only_one_screen(document)?,
        }
    }
    Ok(())
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Builds the candidate screen list for split/merge: the named target, or
/// every screen the adjacency list mentions, in adjacency order. Adjacency
/// entries naming a screen that no longer exists are skipped.
pub(crate) fn candidate_screens(
    document: &ConfigDocument,
    target: Option<&str>,
) -> Result<Vec<String>, ReconcileError> {
    match target {
        Some(name) => {
            if document.screens.find(name).is_none() {
                return Err(ReconcileError::ScreenNotFound {
                    name: name.to_string(),
                });
            }
            Ok(vec![name.to_string()])
        }
        None => Ok(document
            .layout
            .adjacencies
            .iter()
            .map(|adjacency| adjacency.screen.clone())
            .filter(|name| document.screens.find(name).is_some())
            .collect()),
    }
}

/// The parsed bus id of the device a screen runs on, when the device exists
/// and its bus id parses.
pub(crate) fn device_bus_id(devices: &SectionList<Device>, screen: &Screen) -> Option<BusId> {
    let device = devices.find(&screen.device)?;
    let text = device.bus_id.as_deref()?;
    BusId::parse(text).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
