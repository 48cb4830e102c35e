//! On-disk shape of the persisted keys.
//!
//! `recipeState` holds a JSON array of `{name, count, type}` objects, `recipeTemplates`
//! a JSON object mapping template names to arrays of the same shape, and `recipeTitle`
//! a plain JSON string. `count` is either the to-taste marker or a numeric-looking
//! string or number.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recipe_store::{parse_amount, Ingredient, NameError, Quantity, Recipe};

pub const RECIPE_STATE_KEY: &str = "recipeState";
pub const RECIPE_TEMPLATES_KEY: &str = "recipeTemplates";
pub const RECIPE_TITLE_KEY: &str = "recipeTitle";

/// Stored in `count` for ingredients without a fixed amount.
pub const TO_TASTE_MARKER: &str = "по вкусу";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PersistedIngredient {
    pub name: String,
    pub count: PersistedCount,
    #[serde(rename = "type", default)]
    pub unit: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PersistedCount {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Ingredient at position {0} has a blank name")]
    BlankName(usize),
    #[error("Duplicate ingredient name '{0}'")]
    DuplicateName(String),
    #[error("Ingredient '{0}' has a blank count")]
    BlankCount(String),
    #[error("Ingredient '{name}' has an invalid count '{count}'")]
    InvalidCount { name: String, count: String },
    #[error("Template with a blank name")]
    BlankTemplateName,
}

impl From<&Ingredient> for PersistedIngredient {
    fn from(ingredient: &Ingredient) -> Self {
        match &ingredient.quantity {
            Quantity::ToTaste => PersistedIngredient {
                name: ingredient.name.clone(),
                count: PersistedCount::Text(TO_TASTE_MARKER.to_string()),
                unit: String::new(),
            },
            Quantity::Amount { amount, unit } => PersistedIngredient {
                name: ingredient.name.clone(),
                count: PersistedCount::Text(amount.clone()),
                unit: unit.clone(),
            },
        }
    }
}

impl PersistedIngredient {
    fn into_ingredient(self) -> Result<Ingredient, SnapshotError> {
        let count = match self.count {
            PersistedCount::Text(text) => text,
            PersistedCount::Number(number) => number.to_string(),
        };
        let count = count.trim();
        if count.is_empty() {
            return Err(SnapshotError::BlankCount(self.name));
        }
        if count == TO_TASTE_MARKER {
            return Ok(Ingredient::to_taste(&self.name));
        }
        if parse_amount(count).is_none() {
            return Err(SnapshotError::InvalidCount {
                name: self.name,
                count: count.to_string(),
            });
        }
        Ok(Ingredient::amount(&self.name, count, &self.unit))
    }
}

fn to_persisted(recipe: &Recipe) -> Vec<PersistedIngredient> {
    recipe.iter().map(PersistedIngredient::from).collect()
}

fn from_persisted(items: Vec<PersistedIngredient>) -> Result<Recipe, SnapshotError> {
    let mut recipe = Recipe::new();
    for (position, item) in items.into_iter().enumerate() {
        let ingredient = item.into_ingredient()?;
        recipe.push(ingredient).map_err(|e| match e {
            NameError::Blank => SnapshotError::BlankName(position),
            NameError::Duplicate(name) => SnapshotError::DuplicateName(name),
        })?;
    }
    Ok(recipe)
}

pub fn encode_recipe(recipe: &Recipe) -> Result<String, serde_json::Error> {
    serde_json::to_string(&to_persisted(recipe))
}

pub fn decode_recipe(text: &str) -> Result<Recipe, SnapshotError> {
    let items: Vec<PersistedIngredient> = serde_json::from_str(text)?;
    from_persisted(items)
}

pub fn encode_templates(templates: &BTreeMap<String, Recipe>) -> Result<String, serde_json::Error> {
    let persisted: BTreeMap<&str, Vec<PersistedIngredient>> = templates
        .iter()
        .map(|(name, recipe)| (name.as_str(), to_persisted(recipe)))
        .collect();
    serde_json::to_string(&persisted)
}

pub fn decode_templates(text: &str) -> Result<BTreeMap<String, Recipe>, SnapshotError> {
    let persisted: BTreeMap<String, Vec<PersistedIngredient>> = serde_json::from_str(text)?;
    let mut templates = BTreeMap::new();
    for (name, items) in persisted {
        if name.trim().is_empty() {
            return Err(SnapshotError::BlankTemplateName);
        }
        templates.insert(name, from_persisted(items)?);
    }
    Ok(templates)
}
