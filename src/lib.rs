pub mod cli;
pub mod config;
pub mod error;
pub mod recipe_book;
pub mod recipe_parser;
pub mod recipe_scaler;
pub mod recipe_store;
pub mod storage;
pub mod template_registry;

pub use error::RecipeError;
pub use recipe_book::RecipeBook;
