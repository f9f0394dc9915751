//! Canonical facility data model.
//!
//! The authority owns this state; clients hold a cached, eventually
//! consistent copy refreshed after every mutation. All coordinates are in
//! the floor-plan image's natural pixel space.

use serde::{Deserialize, Serialize};

/// Opaque, authority-assigned waypoint identifier.
pub type WaypointId = String;

/// Unique product identifier.
pub type Sku = String;

/// A point in natural pixel coordinates. `z` is reserved for multi-level
/// facilities and is always 0 today.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: i32,
}

impl Point3 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    pub fn distance(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        let dz = (self.z - other.z) as f64;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A navigable node in the facility graph.
///
/// Connections are symmetric: if A lists B, the authority guarantees B
/// lists A. A waypoint without a location is a valid graph node but is not
/// renderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub location: Option<Point3>,
    #[serde(default)]
    pub connections: Vec<WaypointId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub category: String,
    /// `None` means the product is unplaced.
    #[serde(default)]
    pub waypoint_id: Option<WaypointId>,
}

/// One of the two singleton facility points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Entrance,
    Checkout,
}

/// Singleton per-facility settings record.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySettings {
    pub entrance_location: Option<Point3>,
    pub checkout_location: Option<Point3>,
    /// URL of the active floor-plan image asset.
    pub floor_plan_url: Option<String>,
}

impl FacilitySettings {
    pub fn landmark(&self, kind: Landmark) -> Option<Point3> {
        match kind {
            Landmark::Entrance => self.entrance_location,
            Landmark::Checkout => self.checkout_location,
        }
    }

    pub fn set_landmark(&mut self, kind: Landmark, location: Point3) {
        match kind {
            Landmark::Entrance => self.entrance_location = Some(location),
            Landmark::Checkout => self.checkout_location = Some(location),
        }
    }
}

/// An externally computed, ordered sequence of points to walk. Immutable
/// once received; a polyline to render, not a graph.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<Point3>,
}

impl Route {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
