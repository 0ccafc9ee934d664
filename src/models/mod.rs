pub mod settings;
pub mod stock;
pub mod strategy;
pub mod trade;
pub mod user;

pub use settings::*;
pub use stock::*;
pub use strategy::*;
pub use trade::*;
pub use user::*;
