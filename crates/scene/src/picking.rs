//! Screen-space waypoint picking.
//!
//! Ordering contract:
//! - The nearest placed waypoint within the pick radius wins.
//! - At equal distance, the lexically smaller waypoint id wins.
//!
//! Waypoints without a location are never pickable.

use authority::WaypointId;
use foundation::{ContainerRect, NaturalSize, Vec2, to_render_percent};

use crate::cache::GraphCache;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// Pick radius around the pointer, in device pixels.
    pub radius_px: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self { radius_px: 12.0 }
    }
}

/// Finds the waypoint under a pointer position, if any.
///
/// Each placed waypoint's on-screen position is recomputed from its stored
/// natural coordinates through the live container rect, so picking agrees
/// with rendering at any container size. Returns `None` when the image is
/// not ready.
pub fn pick_waypoint(
    graph: &GraphCache,
    click: Vec2,
    rect: ContainerRect,
    natural: NaturalSize,
    opts: PickOptions,
) -> Option<WaypointId> {
    if !natural.is_ready() || rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }

    let mut best: Option<(f64, &WaypointId)> = None;
    for waypoint in graph.waypoints() {
        let Some(location) = waypoint.location else { continue };
        let pct = to_render_percent(location.x, location.y, natural);
        let screen = Vec2::new(
            rect.left + pct.left_pct / 100.0 * rect.width,
            rect.top + pct.top_pct / 100.0 * rect.height,
        );
        let d = screen - click;
        let dist = (d.x * d.x + d.y * d.y).sqrt();
        if dist > opts.radius_px {
            continue;
        }

        best = match best {
            None => Some((dist, &waypoint.id)),
            Some((best_dist, best_id)) => {
                let closer = dist < best_dist
                    || (dist == best_dist && waypoint.id.as_str() < best_id.as_str());
                if closer {
                    Some((dist, &waypoint.id))
                } else {
                    Some((best_dist, best_id))
                }
            }
        };
    }

    best.map(|(_, id)| id.clone())
}
