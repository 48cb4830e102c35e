use thiserror::Error;

use crate::recipe_parser::ParseError;
use crate::recipe_scaler::ScaleError;
use crate::recipe_store::AddError;
use crate::storage::PersistenceError;
use crate::template_registry::{LoadError, SaveError};

/// Every failure a [`crate::recipe_book::RecipeBook`] command can report. None of them
/// is fatal; front ends turn them into user-facing messages.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Name is empty")]
    EmptyName,
    #[error("Ingredient '{0}' is already in the recipe")]
    DuplicateName(String),
    #[error("Quantity '{0}' is not a number greater than zero")]
    InvalidQuantity(String),
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error("Cannot save an empty recipe as a template")]
    EmptyRecipe,
    #[error(transparent)]
    NotFound(#[from] LoadError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Could not persist state: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<AddError> for RecipeError {
    fn from(err: AddError) -> Self {
        match err {
            AddError::EmptyName => RecipeError::EmptyName,
            AddError::DuplicateName(name) => RecipeError::DuplicateName(name),
            AddError::Persistence(e) => RecipeError::Persistence(e),
        }
    }
}

impl From<SaveError> for RecipeError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::EmptyName => RecipeError::EmptyName,
            SaveError::EmptyRecipe => RecipeError::EmptyRecipe,
            SaveError::Persistence(e) => RecipeError::Persistence(e),
        }
    }
}
