use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::recipe_store::{Quantity, Recipe};
use crate::storage::schema::TO_TASTE_MARKER;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("Ratio must be a finite number greater than zero, got {0}")]
    InvalidRatio(f64),
    #[error("Portions must be finite numbers greater than zero, got {old} -> {new}")]
    InvalidPortions { old: f64, new: f64 },
    #[error("Ingredient '{name}' has a non-numeric or non-positive amount '{amount}'")]
    InvalidQuantity { name: String, amount: String },
    #[error("Scaled amount of '{name}' is out of range")]
    OutOfRange { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScaledQuantity {
    /// `value` is already rounded to hundredths.
    Amount { value: f64, unit: String },
    ToTaste,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaledIngredient {
    pub name: String,
    pub quantity: ScaledQuantity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRecipe {
    pub ratio: f64,
    pub ingredients: Vec<ScaledIngredient>,
}

/// Rounds half away from zero to two decimal places.
pub fn round_to_hundredths(value: f64) -> f64 {
    // Past 2^52 / 100 a double has no hundredths left, and `value * 100.0` may overflow.
    if value.abs() >= WHOLE_HUNDREDTHS_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}

const WHOLE_HUNDREDTHS_LIMIT: f64 = 4_503_599_627_370_496.0 / 100.0;

/// Whole numbers print without a fraction, everything else with at most two digits.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let fixed = format!("{:.2}", value);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

impl fmt::Display for ScaledQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaledQuantity::ToTaste => f.write_str(TO_TASTE_MARKER),
            ScaledQuantity::Amount { value, unit } if unit.is_empty() => {
                f.write_str(&format_amount(*value))
            }
            ScaledQuantity::Amount { value, unit } => write!(f, "{} {}", format_amount(*value), unit),
        }
    }
}

impl fmt::Display for ScaledIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.quantity)
    }
}

pub fn scale(recipe: &Recipe, ratio: f64) -> Result<ScaledRecipe, ScaleError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(ScaleError::InvalidRatio(ratio));
    }

    let mut ingredients = Vec::with_capacity(recipe.len());
    for ingredient in recipe {
        let quantity = match &ingredient.quantity {
            Quantity::ToTaste => ScaledQuantity::ToTaste,
            Quantity::Amount { amount, unit } => {
                let value = ingredient.quantity.value().ok_or_else(|| ScaleError::InvalidQuantity {
                    name: ingredient.name.clone(),
                    amount: amount.clone(),
                })?;
                let scaled = round_to_hundredths(value * ratio);
                if !scaled.is_finite() {
                    return Err(ScaleError::OutOfRange {
                        name: ingredient.name.clone(),
                    });
                }
                ScaledQuantity::Amount {
                    value: scaled,
                    unit: unit.clone(),
                }
            }
        };
        ingredients.push(ScaledIngredient {
            name: ingredient.name.clone(),
            quantity,
        });
    }

    debug!(ratio, ingredients = ingredients.len(), "scaled recipe");
    Ok(ScaledRecipe { ratio, ingredients })
}

/// `new / old`, unrounded.
pub fn ratio_from_portions(old_portions: f64, new_portions: f64) -> Result<f64, ScaleError> {
    let valid = |p: f64| p.is_finite() && p > 0.0;
    if !valid(old_portions) || !valid(new_portions) {
        return Err(ScaleError::InvalidPortions {
            old: old_portions,
            new: new_portions,
        });
    }
    Ok(new_portions / old_portions)
}

/// Plain-text export: the title on the first line, then one line per ingredient.
pub fn render_text(title: &str, scaled: &ScaledRecipe) -> String {
    let mut lines = Vec::with_capacity(scaled.ingredients.len() + 1);
    lines.push(title.to_string());
    lines.extend(scaled.ingredients.iter().map(|i| i.to_string()));
    lines.join("\n")
}
