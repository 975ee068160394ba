//! Implementations of the application ports plus configuration loading.

pub mod config;
pub mod store;

pub use config::{load_item_list, ConfigError, ServerConfig};
pub use store::MemoryStore;
