//! Adjacency-list regeneration.
//!
//! The layout's adjacency list is derived state. No transformation edits it
//! in place; whenever the screen sequence changes, the whole list is thrown
//! away and rebuilt here.

use tracing::debug;

use crate::document::{Adjacency, AdjacencyPosition, ConfigDocument};

/// Discards the layout's adjacency list and regenerates it from the screen
/// sequence.
///
/// Entries are numbered densely from 0 in sequence order. The first screen is
/// anchored at the layout origin; every later screen is placed right-of its
/// predecessor, giving a single left-to-right row.
pub fn rebuild_adjacencies(document: &mut ConfigDocument) {
    let mut adjacencies = Vec::with_capacity(document.screens.len());
    let mut previous: Option<&str> = None;

    for (number, screen) in document.screens.iter().enumerate() {
        let position = match previous {
            None => AdjacencyPosition::Absolute { x: 0, y: 0 },
            Some(name) => AdjacencyPosition::RightOf(name.to_string()),
        };
        adjacencies.push(Adjacency {
            number,
            screen: screen.identifier.clone(),
            position,
        });
        previous = Some(&screen.identifier);
    }

    debug!(screens = adjacencies.len(), "rebuilt adjacency list");
    document.layout.adjacencies = adjacencies;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
