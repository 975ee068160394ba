//! Use cases and port interfaces. Handlers orchestrate the persistence
//! gateway; every multi-step mutation happens inside one transaction.

pub mod ports;
pub mod use_cases;

pub use ports::{GameStore, StoreTransaction};
pub use use_cases::{SessionSnapshot, StartingBalanceRange};
