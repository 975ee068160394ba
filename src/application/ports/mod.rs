mod game_store;

pub use game_store::{GameStore, StoreTransaction};
