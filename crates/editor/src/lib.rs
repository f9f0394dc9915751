pub mod controller;
pub mod messages;
pub mod mode;

pub use controller::*;
pub use messages::*;
pub use mode::*;
