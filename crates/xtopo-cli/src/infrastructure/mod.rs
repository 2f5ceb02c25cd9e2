//! Infrastructure layer for the xtopo command-line tool.
//!
//! Contains the file-system-facing adapters: TOML persistence for
//! configuration documents and the two [`DeviceInventory`] implementations,
//! a live sysfs PCI scanner (Linux only) and a file-backed static inventory.
//!
//! **Dependency rule**: this layer may depend on `xtopo-core` but never on
//! `application`; the application layer reaches back into it only through
//! `document_store` and the core's inventory trait.
//!
//! [`DeviceInventory`]: xtopo_core::DeviceInventory

pub mod document_store;
pub mod static_inventory;

#[cfg(target_os = "linux")]
pub mod pci_scan;

#[cfg(target_os = "linux")]
pub use pci_scan::SysfsInventory;
pub use static_inventory::FileInventory;
