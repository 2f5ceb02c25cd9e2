//! Application layer: use cases.
//!
//! Use cases wire the reconciliation engine to the infrastructure adapters.
//! They see persistence through `document_store` and hardware through the
//! `DeviceInventory` trait, never through a concrete scanner.

pub mod apply_topology;
