pub mod kv_store;
pub mod schema;

pub use kv_store::{DirectoryStore, KeyValueStore, MemoryStore, PersistenceError};
pub use schema::{RECIPE_STATE_KEY, RECIPE_TEMPLATES_KEY, RECIPE_TITLE_KEY};
