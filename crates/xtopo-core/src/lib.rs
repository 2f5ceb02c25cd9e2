//! # xtopo-core
//!
//! Topology engine for multi-display configuration documents: the document
//! model, the PCI bus locator, the device-inventory port, and the
//! reconciliation algorithms that rewrite a document to match a requested
//! GPU topology.
//!
//! This crate is pure logic. It never reads sysfs, never opens files, and can
//! be tested on any platform; the `xtopo` binary supplies the inventory and
//! persistence implementations around it.
//!
//! # How a reconciliation runs (for beginners)
//!
//! A configuration document describes *screens* (logical display outputs),
//! each backed by a *device* (a GPU, identified by its PCI bus location) and
//! usually a *monitor*. The document also carries a layout: an ordered
//! adjacency list that gives every screen a number and a position.
//!
//! A [`reconcile::TopologyRequest`] says what the topology should look like —
//! one screen per GPU, separate screens per GPU output, a single screen, a
//! spanning desktop flag. [`reconcile::apply`] expands that into a fixed
//! pipeline of transformations and runs them against the document, fetching
//! GPU facts through whatever [`inventory::DeviceInventory`] implementation
//! the caller passes in. Every transformation finishes by regenerating the
//! adjacency list and dropping device/monitor sections nothing references
//! any more.

pub mod busid;
pub mod document;
pub mod inventory;
pub mod reconcile;

// Re-export the most-used types at the crate root so callers can write
// `xtopo_core::ConfigDocument` instead of `xtopo_core::document::ConfigDocument`.
pub use busid::{BusId, BusIdError};
pub use document::{
    Adjacency, AdjacencyPosition, ConfigDocument, Device, Display, Monitor, OptionBag, Screen,
    Section, SectionList, ServerFlags, ServerLayout,
};
pub use inventory::{DeviceInventory, GpuDescriptor, InventoryError};
pub use reconcile::{apply, PipelineStep, ReconcileError, TopologyRequest};
