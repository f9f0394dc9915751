//! Client-side caches of authority-owned state.
//!
//! Every load is a full replace, never a partial merge; on a failed fetch
//! the caller simply does not call `replace_all` and the previous snapshot
//! stays valid. Nothing here mutates graph topology locally; that is the
//! authority's job.

use std::collections::BTreeMap;

use authority::{Product, Sku, Waypoint, WaypointId};

/// Cached snapshot of the waypoint graph.
#[derive(Debug, Default, Clone)]
pub struct GraphCache {
    waypoints: BTreeMap<WaypointId, Waypoint>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole snapshot with the authority's current state.
    pub fn replace_all(&mut self, waypoints: Vec<Waypoint>) {
        self.waypoints = waypoints.into_iter().map(|w| (w.id.clone(), w)).collect();
    }

    pub fn waypoint(&self, id: &str) -> Option<&Waypoint> {
        self.waypoints.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.waypoints.contains_key(id)
    }

    /// Waypoints in stable id order.
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.values()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Cached snapshot of the product list, including which waypoint each
/// product is placed at.
#[derive(Debug, Default, Clone)]
pub struct ProductCache {
    products: BTreeMap<Sku, Product>,
}

impl ProductCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products.into_iter().map(|p| (p.sku.clone(), p)).collect();
    }

    pub fn product(&self, sku: &str) -> Option<&Product> {
        self.products.get(sku)
    }

    /// Products in stable sku order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Products currently assigned to the given waypoint.
    pub fn placed_at<'a>(&'a self, waypoint_id: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .values()
            .filter(move |p| p.waypoint_id.as_deref() == Some(waypoint_id))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
