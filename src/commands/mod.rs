pub mod auth;
pub mod import;
pub mod settings;
pub mod stats;
pub mod stocks;
pub mod trades;

pub use auth::*;
pub use import::*;
pub use settings::*;
pub use stats::*;
pub use stocks::*;
pub use trades::*;
