//! Interaction modes and the single transient selection slot.
//!
//! Exactly one mode is active at a time; it is UI state, never persisted.
//! The selection slot holds whichever of {selected product, first connect
//! endpoint, move target} the current mode needs; entering a new mode
//! clears it, so only one is ever meaningful.

use authority::{Sku, WaypointId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    /// A product is selected; clicking a waypoint places it there.
    PlacingProduct,
    SetEntrance,
    SetCheckout,
    CreateWaypoint,
    /// Waiting for the first endpoint of a new edge.
    ConnectFirst,
    /// First endpoint remembered; waiting for a different second one.
    ConnectSecond,
    /// Waiting for the waypoint to move.
    MoveSelect,
    /// Move target remembered; waiting for the destination map click.
    MoveTarget,
    /// Waiting for the waypoint to delete (then confirm).
    DeleteSelect,
}

/// The mode-entry buttons of the editing toolbar.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tool {
    SetEntrance,
    SetCheckout,
    CreateWaypoint,
    ConnectWaypoints,
    MoveWaypoint,
    DeleteWaypoint,
}

impl Tool {
    pub fn entry_mode(self) -> InteractionMode {
        match self {
            Tool::SetEntrance => InteractionMode::SetEntrance,
            Tool::SetCheckout => InteractionMode::SetCheckout,
            Tool::CreateWaypoint => InteractionMode::CreateWaypoint,
            Tool::ConnectWaypoints => InteractionMode::ConnectFirst,
            Tool::MoveWaypoint => InteractionMode::MoveSelect,
            Tool::DeleteWaypoint => InteractionMode::DeleteSelect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// Product being placed repeatedly.
    Product(Sku),
    /// First endpoint of an in-progress connection.
    ConnectFrom(WaypointId),
    /// Waypoint an in-progress move will relocate.
    MoveOf(WaypointId),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// The waypoint the overlay should visually distinguish, if any.
    pub fn highlight(&self) -> Option<&WaypointId> {
        match self {
            Selection::ConnectFrom(id) | Selection::MoveOf(id) => Some(id),
            _ => None,
        }
    }
}
