//! PCI bus-location parsing and comparison.
//!
//! Every GPU in the system sits at a fixed PCI address written as
//! `PCI:<bus>:<slot>:<function>` (for example `PCI:1:0:0`).  Device sections
//! carry this string so the server can tell physical GPUs apart; the
//! reconciliation engine parses it to decide which screens live on the same
//! card.
//!
//! Two addresses refer to the same physical GPU when their bus and slot match.
//! The function field distinguishes sub-functions of one card (audio
//! controllers and the like) and is deliberately ignored by
//! [`BusId::same_device`].

use std::fmt;

use thiserror::Error;

/// Error type for bus-id parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusIdError {
    /// The string does not match `PCI:<bus>:<slot>:<function>`.
    #[error("malformed bus id '{text}': expected PCI:<bus>:<slot>:<function>")]
    Malformed { text: String },
}

/// A parsed PCI bus location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusId {
    pub bus: u32,
    pub slot: u32,
    pub function: u32,
}

impl BusId {
    /// Constructs a bus id for a (bus, slot) pair with function 0 — the form
    /// written into Device sections.
    pub fn for_slot(bus: u32, slot: u32) -> Self {
        Self {
            bus,
            slot,
            function: 0,
        }
    }

    /// Parses the canonical `PCI:<bus>:<slot>:<function>` form.
    ///
    /// The `PCI` prefix is matched case-insensitively and surrounding
    /// whitespace is tolerated; everything else is strict — exactly three
    /// numeric fields after the prefix.
    ///
    /// # Errors
    ///
    /// Returns [`BusIdError::Malformed`] if the field count is wrong, the
    /// prefix is missing, or any field is not an unsigned integer.
    pub fn parse(text: &str) -> Result<Self, BusIdError> {
        let malformed = || BusIdError::Malformed {
            text: text.to_string(),
        };

        let trimmed = text.trim();
        let mut fields = trimmed.split(':');

        let prefix = fields.next().ok_or_else(malformed)?;
        if !prefix.eq_ignore_ascii_case("pci") {
            return Err(malformed());
        }

        let parse_field = |f: Option<&str>| -> Result<u32, BusIdError> {
            f.and_then(|s| s.trim().parse::<u32>().ok())
                .ok_or_else(malformed)
        };

        let bus = parse_field(fields.next())?;
        let slot = parse_field(fields.next())?;
        let function = parse_field(fields.next())?;

        if fields.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            bus,
            slot,
            function,
        })
    }

    /// Returns `true` when `other` addresses the same physical GPU.
    ///
    /// Only bus and slot participate; the function field does not identify a
    /// separate card.
    pub fn same_device(&self, other: &BusId) -> bool {
        self.bus == other.bus && self.slot == other.slot
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PCI:{}:{}:{}", self.bus, self.slot, self.function)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
