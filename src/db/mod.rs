//! Persistence module split across logical submodules.

mod connection;
mod content;
mod error;
mod seed;

pub use connection::Database;
pub use content::{
    count_items, delete_all_items, delete_item, fetch_all_items, fetch_item, insert_item,
    insert_items, search_items, update_item,
};
pub use error::StoreError;
pub use seed::seed_items;
