//! The trade journal: form state, the in-memory collection, and the
//! storage backends it can be persisted to.

pub mod form;
pub mod persistence;
pub mod store;

pub use form::TradeDraft;
pub use persistence::{JsonFilePersistence, MemoryPersistence, SqlitePersistence, TradePersistence};
pub use store::TradeStore;
