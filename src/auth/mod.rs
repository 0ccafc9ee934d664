pub mod register;
pub mod repository;

pub use register::{authenticate, register};
pub use repository::{SqliteUserRepository, UserRepository};
