//! xtopo-cli library crate.
//!
//! Everything the `xtopo` binary does beyond argument parsing lives here so
//! that integration tests in `tests/` can drive the same code paths.
//!
//! # Architecture
//!
//! ```text
//! xtopo (main.rs, clap)
//!         ↕
//! [xtopo-cli]
//!   ├── application/      apply_topology: load → reconcile → save
//!   └── infrastructure/
//!         ├── document_store/   TOML persistence of ConfigDocument
//!         ├── pci_scan/         live GPU enumeration from sysfs (Linux)
//!         └── static_inventory/ GPU descriptors from a TOML file
//! ```
//!
//! # Layer rules
//!
//! - `application` depends on `xtopo-core` and the infrastructure store; it
//!   sees GPU enumeration only through the core's `DeviceInventory` trait.
//! - `infrastructure` owns all file-system and sysfs access.

/// Application layer: the apply-topology use case.
pub mod application;

/// Infrastructure layer: document persistence and inventory adapters.
pub mod infrastructure;
