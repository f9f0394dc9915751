//! The remote authority's operation surface and an in-memory reference
//! implementation.
//!
//! The in-memory store enforces the contracts clients rely on but must not
//! re-implement locally: edge symmetry, idempotent connect, and cascade
//! delete of edges when a waypoint goes away.

use std::collections::BTreeMap;

use crate::model::{
    FacilitySettings, Landmark, Point3, Product, Route, Sku, Waypoint, WaypointId,
};
use crate::routing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// Unknown sku or waypoint id.
    NotFound,
    /// Edge or assignment referencing a nonexistent node.
    InvalidReference,
    /// Authority unreachable or non-success response.
    Network(String),
}

impl std::fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorityError::NotFound => write!(f, "unknown sku or waypoint id"),
            AuthorityError::InvalidReference => {
                write!(f, "reference to a nonexistent node")
            }
            AuthorityError::Network(msg) => write!(f, "authority unreachable: {msg}"),
        }
    }
}

impl std::error::Error for AuthorityError {}

/// Operations the remote authority exposes, abstracted from any wire
/// format. Every mutation returns the authoritative result; clients apply
/// it (or reload) rather than assuming success.
pub trait Authority {
    fn list_products(&self) -> Result<Vec<Product>, AuthorityError>;
    fn create_product(&mut self, product: Product) -> Result<Product, AuthorityError>;
    fn update_product(&mut self, sku: &str, product: Product) -> Result<Product, AuthorityError>;
    fn delete_product(&mut self, sku: &str) -> Result<(), AuthorityError>;
    fn assign_product_to_waypoint(
        &mut self,
        sku: &str,
        waypoint_id: &str,
    ) -> Result<Product, AuthorityError>;

    fn list_waypoints(&self) -> Result<Vec<Waypoint>, AuthorityError>;
    fn create_waypoint(&mut self, location: Point3) -> Result<Waypoint, AuthorityError>;
    fn move_waypoint(&mut self, id: &str, location: Point3) -> Result<Waypoint, AuthorityError>;
    fn connect_waypoints(&mut self, a: &str, b: &str) -> Result<(), AuthorityError>;
    fn delete_waypoint(&mut self, id: &str) -> Result<(), AuthorityError>;

    fn get_settings(&self) -> Result<FacilitySettings, AuthorityError>;
    fn update_landmark(
        &mut self,
        kind: Landmark,
        location: Point3,
    ) -> Result<FacilitySettings, AuthorityError>;
    fn set_floor_plan_url(&mut self, url: String) -> Result<FacilitySettings, AuthorityError>;

    /// Opaque to the editing core: item identifiers in, ordered points out.
    fn optimized_route(&self, skus: &[Sku]) -> Result<Route, AuthorityError>;
}

#[derive(Debug, Default)]
pub struct InMemoryAuthority {
    products: BTreeMap<Sku, Product>,
    waypoints: BTreeMap<WaypointId, Waypoint>,
    settings: FacilitySettings,
}

impl InMemoryAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self) -> WaypointId {
        uuid::Uuid::new_v4().to_string()
    }
}

impl Authority for InMemoryAuthority {
    fn list_products(&self) -> Result<Vec<Product>, AuthorityError> {
        Ok(self.products.values().cloned().collect())
    }

    fn create_product(&mut self, product: Product) -> Result<Product, AuthorityError> {
        if let Some(wp) = &product.waypoint_id
            && !self.waypoints.contains_key(wp)
        {
            return Err(AuthorityError::InvalidReference);
        }
        self.products.insert(product.sku.clone(), product.clone());
        Ok(product)
    }

    fn update_product(&mut self, sku: &str, mut product: Product) -> Result<Product, AuthorityError> {
        if !self.products.contains_key(sku) {
            return Err(AuthorityError::NotFound);
        }
        if let Some(wp) = &product.waypoint_id
            && !self.waypoints.contains_key(wp)
        {
            return Err(AuthorityError::InvalidReference);
        }
        product.sku = sku.to_string();
        self.products.insert(product.sku.clone(), product.clone());
        Ok(product)
    }

    fn delete_product(&mut self, sku: &str) -> Result<(), AuthorityError> {
        self.products
            .remove(sku)
            .map(|_| ())
            .ok_or(AuthorityError::NotFound)
    }

    fn assign_product_to_waypoint(
        &mut self,
        sku: &str,
        waypoint_id: &str,
    ) -> Result<Product, AuthorityError> {
        if !self.waypoints.contains_key(waypoint_id) {
            return Err(AuthorityError::NotFound);
        }
        let product = self.products.get_mut(sku).ok_or(AuthorityError::NotFound)?;
        product.waypoint_id = Some(waypoint_id.to_string());
        Ok(product.clone())
    }

    fn list_waypoints(&self) -> Result<Vec<Waypoint>, AuthorityError> {
        Ok(self.waypoints.values().cloned().collect())
    }

    fn create_waypoint(&mut self, location: Point3) -> Result<Waypoint, AuthorityError> {
        let waypoint = Waypoint {
            id: self.fresh_id(),
            location: Some(location),
            connections: Vec::new(),
        };
        self.waypoints.insert(waypoint.id.clone(), waypoint.clone());
        Ok(waypoint)
    }

    fn move_waypoint(&mut self, id: &str, location: Point3) -> Result<Waypoint, AuthorityError> {
        let waypoint = self.waypoints.get_mut(id).ok_or(AuthorityError::NotFound)?;
        waypoint.location = Some(location);
        Ok(waypoint.clone())
    }

    fn connect_waypoints(&mut self, a: &str, b: &str) -> Result<(), AuthorityError> {
        if a == b {
            return Err(AuthorityError::InvalidReference);
        }
        if !self.waypoints.contains_key(b) {
            return Err(AuthorityError::InvalidReference);
        }

        // Symmetric and idempotent: both sides list each other exactly once.
        let wa = self
            .waypoints
            .get_mut(a)
            .ok_or(AuthorityError::InvalidReference)?;
        if !wa.connections.iter().any(|c| c == b) {
            wa.connections.push(b.to_string());
        }
        let wb = self
            .waypoints
            .get_mut(b)
            .ok_or(AuthorityError::InvalidReference)?;
        if !wb.connections.iter().any(|c| c == a) {
            wb.connections.push(a.to_string());
        }
        Ok(())
    }

    fn delete_waypoint(&mut self, id: &str) -> Result<(), AuthorityError> {
        if self.waypoints.remove(id).is_none() {
            return Err(AuthorityError::NotFound);
        }
        // Cascade: strip every back-reference and any product assignment.
        for waypoint in self.waypoints.values_mut() {
            waypoint.connections.retain(|c| c != id);
        }
        for product in self.products.values_mut() {
            if product.waypoint_id.as_deref() == Some(id) {
                product.waypoint_id = None;
            }
        }
        Ok(())
    }

    fn get_settings(&self) -> Result<FacilitySettings, AuthorityError> {
        Ok(self.settings.clone())
    }

    fn update_landmark(
        &mut self,
        kind: Landmark,
        location: Point3,
    ) -> Result<FacilitySettings, AuthorityError> {
        self.settings.set_landmark(kind, location);
        Ok(self.settings.clone())
    }

    fn set_floor_plan_url(&mut self, url: String) -> Result<FacilitySettings, AuthorityError> {
        self.settings.floor_plan_url = Some(url);
        Ok(self.settings.clone())
    }

    fn optimized_route(&self, skus: &[Sku]) -> Result<Route, AuthorityError> {
        Ok(routing::optimize(
            skus,
            &self.products,
            &self.waypoints,
            &self.settings,
        ))
    }
}
