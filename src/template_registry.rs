use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::recipe_store::Recipe;
use crate::storage::schema::{self, RECIPE_TEMPLATES_KEY};
use crate::storage::{KeyValueStore, PersistenceError};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Template name is empty")]
    EmptyName,
    #[error("Cannot save an empty recipe as a template")]
    EmptyRecipe,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("Template '{0}' not found")]
    NotFound(String),
}

/// Named recipe snapshots, persisted as one value under `recipeTemplates`.
#[derive(Debug)]
pub struct TemplateRegistry<S: KeyValueStore> {
    templates: BTreeMap<String, Recipe>,
    store: S,
}

impl<S: KeyValueStore> TemplateRegistry<S> {
    /// Reads every persisted template. Never fails: absent, corrupt or unreadable data
    /// gives an empty registry.
    pub fn open(store: S) -> Self {
        let templates = match store.get(RECIPE_TEMPLATES_KEY) {
            Ok(Some(text)) => schema::decode_templates(&text).unwrap_or_else(|e| {
                warn!(error = %e, "persisted templates are corrupt, starting empty");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "could not read persisted templates, starting empty");
                BTreeMap::new()
            }
        };
        Self { templates, store }
    }

    /// Stores a copy of `recipe` under `name`, replacing any previous template of that name.
    pub fn save(&mut self, name: &str, recipe: &Recipe) -> Result<(), SaveError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SaveError::EmptyName);
        }
        if recipe.is_empty() {
            return Err(SaveError::EmptyRecipe);
        }

        let replaced = self
            .templates
            .insert(name.to_string(), recipe.clone())
            .is_some();
        info!(template = name, ingredients = recipe.len(), replaced, "saved template");
        self.persist()?;
        Ok(())
    }

    /// Sorted by name.
    pub fn list(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Returns an owned copy; changing it does not touch the stored template.
    pub fn load(&self, name: &str) -> Result<Recipe, LoadError> {
        let name = name.trim();
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<bool, PersistenceError> {
        let removed = self.templates.remove(name.trim()).is_some();
        if removed {
            info!(template = name.trim(), "removed template");
        }
        self.persist()?;
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let encoded = schema::encode_templates(&self.templates)?;
        self.store.set(RECIPE_TEMPLATES_KEY, &encoded)
    }
}
