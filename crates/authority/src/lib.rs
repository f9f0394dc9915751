pub mod model;
pub mod routing;
pub mod store;

pub use model::*;
pub use store::*;
