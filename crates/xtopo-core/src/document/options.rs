//! Option entries attached to configuration sections.
//!
//! Sections carry free-form `Option "Name" "Value"` entries. The server treats
//! option names case-insensitively, so replacing an option must drop any
//! existing spelling variant before appending the new entry. Order is
//! otherwise preserved as written.

use serde::{Deserialize, Serialize};

/// A single option entry: a name and an optional value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub name: String,
    /// `None` for valueless (bare) options.
    pub value: Option<String>,
}

/// An ordered collection of option entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionBag {
    entries: Vec<OptionEntry>,
}

impl OptionBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any entry whose name matches
    /// case-insensitively. The new entry is appended at the end.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.remove(name);
        self.entries.push(OptionEntry {
            name: name.to_string(),
            value: Some(value.into()),
        });
    }

    /// Removes every entry whose name matches `name` case-insensitively.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|e| !e.name.eq_ignore_ascii_case(name));
    }

    /// Finds the first entry whose name matches case-insensitively.
    pub fn get(&self, name: &str) -> Option<&OptionEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
