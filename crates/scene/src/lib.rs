pub mod cache;
pub mod overlay;
pub mod picking;

pub use cache::*;
pub use overlay::*;
pub use picking::*;
