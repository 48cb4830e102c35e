use tracing::{info, warn};

use crate::error::RecipeError;
use crate::recipe_parser::{parse_ingredient_line, parse_ingredient_lines, ParsedIngredient};
use crate::recipe_scaler::{ratio_from_portions, render_text, scale, ScaledRecipe};
use crate::recipe_store::{parse_amount, Recipe, RecipeStore};
use crate::storage::KeyValueStore;
use crate::template_registry::TemplateRegistry;

/// The command surface a front end drives: one current recipe plus the saved templates,
/// both written through to the same key-value store.
#[derive(Debug)]
pub struct RecipeBook<S: KeyValueStore + Clone> {
    recipe: RecipeStore<S>,
    templates: TemplateRegistry<S>,
}

impl<S: KeyValueStore + Clone> RecipeBook<S> {
    pub fn open(store: S) -> Self {
        let recipe = RecipeStore::open(store.clone());
        let templates = TemplateRegistry::open(store);
        info!(
            ingredients = recipe.len(),
            templates = templates.len(),
            "recipe book ready"
        );
        Self { recipe, templates }
    }

    pub fn recipe(&self) -> &Recipe {
        self.recipe.snapshot()
    }

    pub fn title(&self) -> &str {
        self.recipe.title()
    }

    /// A non-blank `count_text` must be a number greater than zero; a blank one means
    /// "to taste".
    pub fn add_ingredient(&mut self, name: &str, count_text: &str, unit: &str) -> Result<(), RecipeError> {
        if name.trim().is_empty() {
            return Err(RecipeError::EmptyName);
        }
        if !count_text.trim().is_empty() && parse_amount(count_text).is_none() {
            return Err(RecipeError::InvalidQuantity(count_text.trim().to_string()));
        }
        self.recipe.add(name, count_text, unit)?;
        Ok(())
    }

    /// Parses a free-text line such as `"мука 200 г"` and adds it.
    pub fn add_from_text(&mut self, text: &str) -> Result<ParsedIngredient, RecipeError> {
        let parsed = parse_ingredient_line(text)?;
        self.add_ingredient(&parsed.ingredient_name, &parsed.quantity, &parsed.unit)?;
        Ok(parsed)
    }

    /// Adds every ingredient line of `text`. Lines that do not parse or are rejected are
    /// skipped and returned with their 1-based line numbers; the rest are kept.
    pub fn import_lines(&mut self, text: &str) -> Vec<(usize, RecipeError)> {
        let mut skipped = Vec::new();
        for (line_no, parsed) in parse_ingredient_lines(text) {
            let outcome = parsed
                .map_err(RecipeError::from)
                .and_then(|p| self.add_ingredient(&p.ingredient_name, &p.quantity, &p.unit));
            if let Err(e) = outcome {
                warn!(line = line_no, error = %e, "skipped ingredient line");
                skipped.push((line_no, e));
            }
        }
        skipped
    }

    pub fn remove_ingredient(&mut self, name: &str) -> Result<(), RecipeError> {
        self.recipe.remove(name)?;
        Ok(())
    }

    pub fn rename_recipe(&mut self, title: &str) -> Result<(), RecipeError> {
        self.recipe.rename(title)?;
        Ok(())
    }

    /// The caller must have asked the user first.
    pub fn clear_recipe(&mut self) -> Result<(), RecipeError> {
        self.recipe.clear()?;
        Ok(())
    }

    pub fn scale_by_ratio(&self, ratio: f64) -> Result<ScaledRecipe, RecipeError> {
        Ok(scale(self.recipe.snapshot(), ratio)?)
    }

    /// The derived ratio is available as [`ScaledRecipe::ratio`].
    pub fn scale_by_portions(&self, old_portions: f64, new_portions: f64) -> Result<ScaledRecipe, RecipeError> {
        let ratio = ratio_from_portions(old_portions, new_portions)?;
        self.scale_by_ratio(ratio)
    }

    /// Plain-text copy of a scaled recipe under the current title.
    pub fn export_text(&self, scaled: &ScaledRecipe) -> String {
        render_text(self.recipe.title(), scaled)
    }

    pub fn save_template(&mut self, name: &str) -> Result<(), RecipeError> {
        self.templates.save(name, self.recipe.snapshot())?;
        Ok(())
    }

    /// Replaces the current recipe with the template's ingredients.
    pub fn load_template(&mut self, name: &str) -> Result<(), RecipeError> {
        let recipe = self.templates.load(name)?;
        self.recipe.restore(recipe)?;
        info!(template = name.trim(), "loaded template");
        Ok(())
    }

    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.list()
    }

    pub fn remove_template(&mut self, name: &str) -> Result<bool, RecipeError> {
        Ok(self.templates.remove(name)?)
    }
}
