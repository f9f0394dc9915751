pub mod geom;
pub mod transform;

// Foundation crate: small, well-tested primitives only.
pub use geom::*;
pub use transform::*;
