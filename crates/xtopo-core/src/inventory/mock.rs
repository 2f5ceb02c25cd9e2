//! Mock inventory for unit testing.
//!
//! Lets tests and benchmarks script the GPU set without touching sysfs or any
//! other platform source.

use std::sync::Mutex;

use super::{DeviceInventory, GpuDescriptor, InventoryError};

/// Builds a plain two-output descriptor for tests; tweak fields as needed.
pub fn descriptor(bus: u32, slot: u32, product_name: &str) -> GpuDescriptor {
    GpuDescriptor {
        bus,
        slot,
        output_pipelines: 2,
        product_name: product_name.to_string(),
        display_mask: 0b11,
        primary: false,
    }
}

/// A scripted [`DeviceInventory`] that replays a fixed reply and counts calls.
pub struct MockInventory {
    reply: Result<Vec<GpuDescriptor>, InventoryError>,
    calls: Mutex<u32>,
}

impl MockInventory {
    /// A mock that reports exactly these GPUs on every call.
    pub fn with_gpus(gpus: Vec<GpuDescriptor>) -> Self {
        Self {
            reply: Ok(gpus),
            calls: Mutex::new(0),
        }
    }

    /// A mock whose source cannot be queried at all.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            reply: Err(InventoryError::Unavailable {
                reason: reason.to_string(),
            }),
            calls: Mutex::new(0),
        }
    }

    /// Returns how many times [`DeviceInventory::enumerate`] was called.
    pub fn enumerate_calls(&self) -> u32 {
        *self.calls.lock().expect("lock poisoned")
    }
}

impl DeviceInventory for MockInventory {
    fn enumerate(&self) -> Result<Vec<GpuDescriptor>, InventoryError> {
        *self.calls.lock().expect("lock poisoned") += 1;
        self.reply.clone()
    }
}
