//! The configuration-document model.
//!
//! A [`ConfigDocument`] is the parsed shape of an X-style display
//! configuration: ordered lists of Screen, Device, and Monitor sections, one
//! server layout whose adjacency entries mirror the screen sequence, and an
//! optional server-flags section.  Sections reference each other by
//! identifier (a Screen names its Device and, optionally, its Monitor), never
//! by position, so the reconciliation engine can splice and remove records
//! without invalidating references.
//!
//! Nothing here decides topology.  The types model the document; the
//! `reconcile` module rewrites it.

pub mod list;
pub mod options;

use serde::{Deserialize, Serialize};

pub use list::{Section, SectionList};
pub use options::{OptionBag, OptionEntry};

/// Color depth given to screens created from scratch.
pub const DEFAULT_DEPTH: u32 = 24;

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

/// One Screen section: binds a device (and optionally a monitor) to a set of
/// display subsections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub identifier: String,
    /// Identifier of the Device section this screen runs on.
    pub device: String,
    /// Identifier of the Monitor section, if one is attached.  Several screens
    /// may share one monitor record.
    #[serde(default)]
    pub monitor: Option<String>,
    #[serde(default = "default_depth")]
    pub default_depth: u32,
    /// Per-depth display subsections, owned by the screen and deep-copied when
    /// the screen is cloned.
    #[serde(default)]
    pub displays: Vec<Display>,
    #[serde(default)]
    pub options: OptionBag,
}

impl Screen {
    /// Creates a screen bound to `device` with the default depth and no
    /// display subsections.
    pub fn new(identifier: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            device: device.into(),
            monitor: None,
            default_depth: DEFAULT_DEPTH,
            displays: Vec::new(),
            options: OptionBag::new(),
        }
    }
}

impl Section for Screen {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// One Device section: a GPU (or one output of a GPU, once screens have been
/// split per output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub identifier: String,
    /// PCI bus location string (`PCI:<bus>:<slot>:<function>`).  `None` when
    /// the config predates bus-id assignment.
    #[serde(default)]
    pub bus_id: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    /// Marketing name of the board, e.g. a GPU product name.
    #[serde(default)]
    pub board: Option<String>,
    #[serde(default)]
    pub chipset: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    /// Which output of the physical GPU this device drives: `Some(0)` for the
    /// first, `Some(1)` for the second, `None` when the GPU is not split.
    #[serde(default)]
    pub screen_index: Option<u8>,
    /// Probed hardware details; `None` means unknown.  Cleared on cloned
    /// devices because a probe result only describes the original.
    #[serde(default)]
    pub chip_id: Option<i32>,
    #[serde(default)]
    pub chip_rev: Option<i32>,
    #[serde(default)]
    pub irq: Option<i32>,
    #[serde(default)]
    pub options: OptionBag,
}

impl Device {
    /// Creates a device with nothing but an identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            bus_id: None,
            vendor: None,
            board: None,
            chipset: None,
            card: None,
            driver: None,
            screen_index: None,
            chip_id: None,
            chip_rev: None,
            irq: None,
            options: OptionBag::new(),
        }
    }
}

impl Section for Device {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// One Monitor section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub identifier: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub options: OptionBag,
}

impl Monitor {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            vendor: None,
            model_name: None,
            options: OptionBag::new(),
        }
    }
}

impl Section for Monitor {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// A Display subsection of a screen: one depth with its mode list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub depth: u32,
    #[serde(default)]
    pub modes: Vec<String>,
    /// Virtual desktop size `(width, height)` at this depth, if fixed.
    #[serde(default)]
    pub virtual_size: Option<(u32, u32)>,
    #[serde(default)]
    pub visual: Option<String>,
    #[serde(default)]
    pub options: OptionBag,
}

impl Display {
    /// A bare display subsection at the given depth.
    pub fn at_depth(depth: u32) -> Self {
        Self {
            depth,
            modes: Vec::new(),
            virtual_size: None,
            visual: None,
            options: OptionBag::new(),
        }
    }
}

/// Where a screen sits in the server layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjacencyPosition {
    /// Fixed top-left corner in layout coordinates.
    Absolute { x: i32, y: i32 },
    /// Immediately to the right of the named screen.
    RightOf(String),
}

/// One entry of the layout's screen placement list.
///
/// The list is derived data: after every structural change the reconciliation
/// engine rebuilds it from the screen sequence, numbering entries densely from
/// zero in sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    pub number: usize,
    /// Identifier of the screen being placed.
    pub screen: String,
    pub position: AdjacencyPosition,
}

/// The ServerLayout section: names the layout and places every screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerLayout {
    pub identifier: String,
    #[serde(default)]
    pub adjacencies: Vec<Adjacency>,
}

impl Default for ServerLayout {
    fn default() -> Self {
        Self {
            identifier: "Layout0".to_string(),
            adjacencies: Vec::new(),
        }
    }
}

/// The ServerFlags section: global boolean options such as `Xinerama`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerFlags {
    #[serde(default)]
    pub options: OptionBag,
}

/// A complete parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    /// Screen sections in sequence order.  Order is meaningful: it drives
    /// adjacency numbering and left-to-right placement.
    pub screens: SectionList<Screen>,
    pub devices: SectionList<Device>,
    pub monitors: SectionList<Monitor>,
    pub layout: ServerLayout,
    /// Global flags; absent until something sets one.
    pub flags: Option<ServerFlags>,
}

impl ConfigDocument {
    /// An empty document with a default layout and no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the device section a screen references.
    pub fn device_for(&self, screen: &Screen) -> Option<&Device> {
        self.devices.find(&screen.device)
    }

    /// Sets a global boolean flag, creating the flags section on first use.
    ///
    /// Any existing option with the same name (compared case-insensitively) is
    /// replaced, so calling this repeatedly with either value leaves exactly
    /// one entry.  `true` writes `"1"`, `false` writes `"0"`.
    pub fn set_boolean_flag(&mut self, name: &str, enabled: bool) {
        let flags = self.flags.get_or_insert_with(ServerFlags::default);
        flags.options.set(name, if enabled { "1" } else { "0" });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
