use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::schema::{self, RECIPE_STATE_KEY, RECIPE_TITLE_KEY, TO_TASTE_MARKER};
use crate::storage::{KeyValueStore, PersistenceError};

pub const DEFAULT_TITLE: &str = "Название рецепта";

#[derive(Debug, Error)]
pub enum AddError {
    #[error("Ingredient name is empty")]
    EmptyName,
    #[error("Ingredient '{0}' is already in the recipe")]
    DuplicateName(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Why a [`Recipe`] refused an ingredient.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NameError {
    #[error("Ingredient name is empty")]
    Blank,
    #[error("Ingredient '{0}' is already in the recipe")]
    Duplicate(String),
}

impl From<NameError> for AddError {
    fn from(err: NameError) -> Self {
        match err {
            NameError::Blank => AddError::EmptyName,
            NameError::Duplicate(name) => AddError::DuplicateName(name),
        }
    }
}

/// Interprets an amount as a positive finite number. A single `,` is accepted as the
/// decimal separator.
pub fn parse_amount(text: &str) -> Option<f64> {
    let normalized = text.trim().replacen(',', ".", 1);
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    /// `amount` is the text as entered; see [`Quantity::value`].
    Amount { amount: String, unit: String },
    ToTaste,
}

impl Quantity {
    pub fn value(&self) -> Option<f64> {
        match self {
            Quantity::Amount { amount, .. } => parse_amount(amount),
            Quantity::ToTaste => None,
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            Quantity::Amount { unit, .. } => unit,
            Quantity::ToTaste => "",
        }
    }

}

#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Quantity,
}

impl Ingredient {
    /// Blank `quantity_text` means "to taste" and discards `unit`.
    pub fn new(name: &str, quantity_text: &str, unit: &str) -> Self {
        if quantity_text.trim().is_empty() {
            Self::to_taste(name)
        } else {
            Self::amount(name, quantity_text, unit)
        }
    }

    pub fn amount(name: &str, amount: &str, unit: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            quantity: Quantity::Amount {
                amount: amount.trim().to_string(),
                unit: unit.to_string(),
            },
        }
    }

    pub fn to_taste(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            quantity: Quantity::ToTaste,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.quantity {
            Quantity::ToTaste => write!(f, "{} {}", self.name, TO_TASTE_MARKER),
            Quantity::Amount { amount, unit } if unit.is_empty() => {
                write!(f, "{} {}", self.name, amount)
            }
            Quantity::Amount { amount, unit } => write!(f, "{} {} {}", self.name, amount, unit),
        }
    }
}

/// Ordered ingredient list with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    ingredients: Vec<Ingredient>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ingredient> {
        self.ingredients.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Appends `ingredient`, keeping names non-blank and unique (exact match).
    pub fn push(&mut self, ingredient: Ingredient) -> Result<(), NameError> {
        if ingredient.name.trim().is_empty() {
            return Err(NameError::Blank);
        }
        if self.contains(&ingredient.name) {
            return Err(NameError::Duplicate(ingredient.name));
        }
        self.ingredients.push(ingredient);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Ingredient> {
        let index = self.ingredients.iter().position(|i| i.name == name)?;
        Some(self.ingredients.remove(index))
    }
}

impl<'a> IntoIterator for &'a Recipe {
    type Item = &'a Ingredient;
    type IntoIter = std::slice::Iter<'a, Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.ingredients.iter()
    }
}

/// The current recipe, written through to `S` after every mutation.
#[derive(Debug)]
pub struct RecipeStore<S: KeyValueStore> {
    recipe: Recipe,
    title: String,
    store: S,
}

impl<S: KeyValueStore> RecipeStore<S> {
    /// Loads the persisted recipe and title. Missing or unreadable state yields an empty
    /// recipe; nothing is written back.
    pub fn open(store: S) -> Self {
        let recipe = match store.get(RECIPE_STATE_KEY) {
            Ok(Some(text)) => schema::decode_recipe(&text).unwrap_or_else(|e| {
                warn!(error = %e, "persisted recipe is corrupt, starting empty");
                Recipe::new()
            }),
            Ok(None) => Recipe::new(),
            Err(e) => {
                warn!(error = %e, "could not read persisted recipe, starting empty");
                Recipe::new()
            }
        };

        let title = match store.get(RECIPE_TITLE_KEY) {
            Ok(Some(text)) => serde_json::from_str::<String>(&text)
                .map(|t| normalize_title(&t))
                .unwrap_or_else(|e| {
                    warn!(error = %e, "persisted title is corrupt, using default");
                    DEFAULT_TITLE.to_string()
                }),
            Ok(None) => DEFAULT_TITLE.to_string(),
            Err(e) => {
                warn!(error = %e, "could not read persisted title, using default");
                DEFAULT_TITLE.to_string()
            }
        };

        debug!(ingredients = recipe.len(), %title, "opened recipe store");
        Self { recipe, title, store }
    }

    pub fn add(&mut self, name: &str, quantity_text: &str, unit: &str) -> Result<(), AddError> {
        let ingredient = Ingredient::new(name, quantity_text, unit);
        self.recipe.push(ingredient)?;
        debug!(name = name.trim(), "added ingredient");
        self.persist()?;
        Ok(())
    }

    /// Removing an absent name is a no-op apart from the write.
    pub fn remove(&mut self, name: &str) -> Result<(), PersistenceError> {
        if self.recipe.remove(name).is_some() {
            debug!(name, "removed ingredient");
        }
        self.persist()
    }

    pub fn rename(&mut self, new_title: &str) -> Result<(), PersistenceError> {
        self.title = normalize_title(new_title);
        let encoded = serde_json::to_string(&self.title)?;
        self.store.set(RECIPE_TITLE_KEY, &encoded)
    }

    /// Confirmation is the caller's job.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.recipe = Recipe::new();
        debug!("cleared recipe");
        self.persist()
    }

    pub fn snapshot(&self) -> &Recipe {
        &self.recipe
    }

    /// Replaces the whole list, e.g. when a template is loaded.
    pub fn restore(&mut self, recipe: Recipe) -> Result<(), PersistenceError> {
        self.recipe = recipe;
        debug!(ingredients = self.recipe.len(), "restored recipe");
        self.persist()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.recipe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipe.is_empty()
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let encoded = schema::encode_recipe(&self.recipe)?;
        self.store.set(RECIPE_STATE_KEY, &encoded)
    }
}

fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}
