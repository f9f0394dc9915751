//! Derives the visual primitives to draw over the floor-plan image.
//!
//! This is a pure function of the cached snapshots, the current selection
//! highlight, and the image's natural size, deliberately decoupled from
//! any rendering callback timing. Layers are ordered for painting: base
//! image (not ours), then edges, waypoint markers, landmark markers, and
//! the selection highlight on top. The route polyline is a separate,
//! non-editable view.

use std::collections::BTreeSet;

use authority::{FacilitySettings, Landmark, Route, WaypointId};
use foundation::{NaturalSize, RenderPercent, Vec2, to_render_percent};

use crate::cache::GraphCache;

/// One point per placed waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointMarker {
    pub id: WaypointId,
    pub at: RenderPercent,
    /// True when this waypoint is the first endpoint of an in-progress
    /// connection or the target of an in-progress move.
    pub highlighted: bool,
}

/// One line segment per graph edge, endpoints in render percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSegment {
    pub a: RenderPercent,
    pub b: RenderPercent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkMarker {
    pub kind: Landmark,
    pub at: RenderPercent,
}

/// Everything the editor view draws over the base image, in paint order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OverlayFrame {
    pub edges: Vec<EdgeSegment>,
    pub waypoints: Vec<WaypointMarker>,
    pub landmarks: Vec<LandmarkMarker>,
    /// Painted last, on top of its marker.
    pub highlight: Option<WaypointMarker>,
}

/// Builds the editor overlay for the current snapshots.
///
/// Tolerates whatever the cache holds: unplaced waypoints are skipped,
/// edges whose far endpoint is missing or unplaced are skipped, and an
/// asymmetric edge (stale or buggy authority data) is still drawn exactly
/// once rather than faulting.
pub fn overlay_frame(
    graph: &GraphCache,
    settings: &FacilitySettings,
    highlight: Option<&WaypointId>,
    natural: NaturalSize,
) -> OverlayFrame {
    let mut frame = OverlayFrame::default();
    let mut seen_edges: BTreeSet<(WaypointId, WaypointId)> = BTreeSet::new();

    for waypoint in graph.waypoints() {
        let Some(location) = waypoint.location else { continue };
        let at = to_render_percent(location.x, location.y, natural);

        let is_highlight = highlight.is_some_and(|h| *h == waypoint.id);
        let marker = WaypointMarker {
            id: waypoint.id.clone(),
            at,
            highlighted: is_highlight,
        };
        if is_highlight {
            frame.highlight = Some(marker.clone());
        }
        frame.waypoints.push(marker);

        for peer_id in &waypoint.connections {
            if *peer_id == waypoint.id {
                continue;
            }
            let key = if waypoint.id < *peer_id {
                (waypoint.id.clone(), peer_id.clone())
            } else {
                (peer_id.clone(), waypoint.id.clone())
            };
            if seen_edges.contains(&key) {
                continue;
            }

            // Dangling reference after a delete, before the next reload:
            // skip rather than fault.
            let Some(peer) = graph.waypoint(peer_id) else { continue };
            let Some(peer_location) = peer.location else { continue };

            seen_edges.insert(key);
            frame.edges.push(EdgeSegment {
                a: at,
                b: to_render_percent(peer_location.x, peer_location.y, natural),
            });
        }
    }

    for kind in [Landmark::Entrance, Landmark::Checkout] {
        if let Some(location) = settings.landmark(kind) {
            frame.landmarks.push(LandmarkMarker {
                kind,
                at: to_render_percent(location.x, location.y, natural),
            });
        }
    }

    frame
}

/// The server-supplied route as a connected polyline through its ordered
/// points. Route points are rendered in the coordinate space they already
/// use; routes are produced fresh per request, not stored, so no
/// normalization is applied.
pub fn route_polyline(route: &Route) -> Vec<Vec2> {
    route
        .points
        .iter()
        .map(|p| Vec2::new(p.x as f64, p.y as f64))
        .collect()
}
