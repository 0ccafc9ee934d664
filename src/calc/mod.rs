pub mod analysis;
pub mod metrics;
pub mod pnl;

pub use analysis::*;
pub use metrics::*;
pub use pnl::*;
