//! Route optimization over the waypoint graph.
//!
//! Stop order is greedy nearest-neighbor (start from the entrance when one
//! is set, otherwise from the first requested item). Each leg between
//! consecutive stops is expanded into the shortest waypoint-graph path by
//! Dijkstra on Euclidean edge lengths; a leg with no graph path degrades
//! to a straight segment so a sparse graph still yields a walkable
//! polyline.

use std::collections::{BTreeMap, BinaryHeap, HashMap};

use crate::model::{FacilitySettings, Point3, Product, Route, Sku, Waypoint, WaypointId};

/// A stop the optimizer must visit: a placed product's waypoint.
#[derive(Debug, Clone)]
struct Stop {
    waypoint_id: WaypointId,
    location: Point3,
}

pub fn optimize(
    skus: &[Sku],
    products: &BTreeMap<Sku, Product>,
    waypoints: &BTreeMap<WaypointId, Waypoint>,
    settings: &FacilitySettings,
) -> Route {
    let mut stops: Vec<Stop> = Vec::new();
    for sku in skus {
        let Some(product) = products.get(sku) else { continue };
        let Some(waypoint_id) = &product.waypoint_id else { continue };
        let Some(waypoint) = waypoints.get(waypoint_id) else { continue };
        let Some(location) = waypoint.location else { continue };
        if stops.iter().any(|s| &s.waypoint_id == waypoint_id) {
            continue;
        }
        stops.push(Stop {
            waypoint_id: waypoint_id.clone(),
            location,
        });
    }

    if stops.is_empty() {
        return Route::default();
    }

    let ordered = order_stops(stops, settings.entrance_location);

    let mut points: Vec<Point3> = Vec::new();
    if let Some(entrance) = settings.entrance_location {
        points.push(entrance);
    }
    points.push(ordered[0].location);
    for pair in ordered.windows(2) {
        let leg = shortest_path(waypoints, &pair[0].waypoint_id, &pair[1].waypoint_id);
        match leg {
            Some(path) => {
                // The leg starts at the previous stop, already emitted.
                for id in path.iter().skip(1) {
                    if let Some(loc) = waypoints.get(id).and_then(|w| w.location) {
                        points.push(loc);
                    }
                }
            }
            None => points.push(pair[1].location),
        }
    }
    if let Some(checkout) = settings.checkout_location {
        points.push(checkout);
    }

    points.dedup();
    Route::new(points)
}

fn order_stops(mut unvisited: Vec<Stop>, start: Option<Point3>) -> Vec<Stop> {
    let mut ordered = Vec::with_capacity(unvisited.len());

    let first = match start {
        Some(origin) => nearest_index(&unvisited, origin),
        None => 0,
    };
    let mut current = unvisited.remove(first);

    while !unvisited.is_empty() {
        let next = nearest_index(&unvisited, current.location);
        let stop = unvisited.remove(next);
        ordered.push(current);
        current = stop;
    }
    ordered.push(current);
    ordered
}

fn nearest_index(stops: &[Stop], from: Point3) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (idx, stop) in stops.iter().enumerate() {
        let dist = from.distance(stop.location);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}

/// Dijkstra over the waypoint graph. Returns the waypoint ids along the
/// path, endpoints included, or `None` when the endpoints are not
/// connected. Edges to waypoints without a location are not traversable.
fn shortest_path(
    waypoints: &BTreeMap<WaypointId, Waypoint>,
    from: &str,
    to: &str,
) -> Option<Vec<WaypointId>> {
    #[derive(PartialEq)]
    struct Candidate {
        cost: f64,
        id: WaypointId,
    }
    impl Eq for Candidate {}
    impl Ord for Candidate {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            // Min-heap on cost; tie-break on id for determinism.
            other
                .cost
                .total_cmp(&self.cost)
                .then_with(|| other.id.cmp(&self.id))
        }
    }
    impl PartialOrd for Candidate {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    if from == to {
        return Some(vec![from.to_string()]);
    }

    let mut dist: HashMap<&str, f64> = HashMap::new();
    let mut prev: HashMap<&str, &str> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(from, 0.0);
    heap.push(Candidate {
        cost: 0.0,
        id: from.to_string(),
    });

    while let Some(Candidate { cost, id }) = heap.pop() {
        if id == to {
            break;
        }
        let Some((key, waypoint)) = waypoints.get_key_value(id.as_str()) else {
            continue;
        };
        if cost > dist.get(id.as_str()).copied().unwrap_or(f64::MAX) {
            continue;
        }
        let Some(here) = waypoint.location else { continue };

        for neighbor_id in &waypoint.connections {
            let Some((nkey, neighbor)) = waypoints.get_key_value(neighbor_id.as_str()) else {
                continue;
            };
            let Some(there) = neighbor.location else { continue };

            let next_cost = cost + here.distance(there);
            if next_cost < dist.get(nkey.as_str()).copied().unwrap_or(f64::MAX) {
                dist.insert(nkey.as_str(), next_cost);
                prev.insert(nkey.as_str(), key.as_str());
                heap.push(Candidate {
                    cost: next_cost,
                    id: nkey.clone(),
                });
            }
        }
    }

    if !prev.contains_key(to) {
        return None;
    }

    let mut path = vec![to.to_string()];
    let mut cursor = to;
    while let Some(&parent) = prev.get(cursor) {
        path.push(parent.to_string());
        cursor = parent;
    }
    path.reverse();
    Some(path)
}
