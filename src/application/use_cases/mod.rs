mod adjust_balance;
mod buy_item;
mod catalog;
mod game_data;
mod login;
mod logout;
mod sell_item;

pub use adjust_balance::adjust_balance;
pub use buy_item::buy_item;
pub use catalog::list_catalog;
pub use game_data::{game_data, SessionSnapshot};
pub use login::{login, StartingBalanceRange};
pub use logout::logout;
pub use sell_item::sell_item;
