//! Free-text ingredient lines, as produced by dictation or typed in bulk.
//!
//! Two shapes are understood: `"<name> <number> <unit>"` and `"<name> по вкусу"`.
//! Anything else is rejected so that it never reaches the recipe.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static AMOUNT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s+(\d+(?:[.,]\d+)?)\s+(\S.*?)\s*$").expect("amount pattern is valid")
});

static TO_TASTE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s+по\s+вкусу\s*$").expect("to-taste pattern is valid")
});

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub ingredient_name: String,
    /// Empty for "to taste".
    pub quantity: String,
    pub unit: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Could not recognise '{0}'. Example: \"мука 200 г\" or \"соль по вкусу\"")]
    Unrecognized(String),
}

pub fn parse_ingredient_line(text: &str) -> Result<ParsedIngredient, ParseError> {
    if let Some(caps) = AMOUNT_LINE.captures(text) {
        return Ok(ParsedIngredient {
            ingredient_name: caps[1].trim().to_string(),
            quantity: caps[2].to_string(),
            unit: caps[3].to_string(),
        });
    }
    if let Some(caps) = TO_TASTE_LINE.captures(text) {
        return Ok(ParsedIngredient {
            ingredient_name: caps[1].trim().to_string(),
            quantity: String::new(),
            unit: String::new(),
        });
    }
    Err(ParseError::Unrecognized(text.trim().to_string()))
}

/// Parses every non-blank line that is not a `#` comment. Each result carries its
/// 1-based line number.
pub fn parse_ingredient_lines(text: &str) -> Vec<(usize, Result<ParsedIngredient, ParseError>)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| (idx + 1, parse_ingredient_line(line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(name: &str, quantity: &str, unit: &str) -> ParsedIngredient {
        ParsedIngredient {
            ingredient_name: name.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_parse_amount_line() {
        assert_eq!(parse_ingredient_line("мука 200 г"), Ok(parsed("мука", "200", "г")));
        assert_eq!(
            parse_ingredient_line("  сливочное масло 1,5 ст. л. "),
            Ok(parsed("сливочное масло", "1,5", "ст. л."))
        );
    }

    #[test]
    fn test_parse_to_taste_line() {
        assert_eq!(parse_ingredient_line("соль по вкусу"), Ok(parsed("соль", "", "")));
        assert_eq!(
            parse_ingredient_line("Чёрный перец По Вкусу"),
            Ok(parsed("Чёрный перец", "", ""))
        );
    }

    #[test]
    fn test_parse_rejects_unrecognized() {
        for text in ["мука", "200 г", "мука двести грамм", "", "соль по"] {
            assert!(matches!(parse_ingredient_line(text), Err(ParseError::Unrecognized(_))), "{text}");
        }
    }

    #[test]
    fn test_parse_lines_skips_blank_and_comments() {
        let text = "# тесто\nмука 200 г\n\nсоль по вкусу\nчто-то странное\n";
        let results = parse_ingredient_lines(text);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], (2, Ok(parsed("мука", "200", "г"))));
        assert_eq!(results[1], (4, Ok(parsed("соль", "", ""))));
        assert_eq!(results[2].0, 5);
        assert!(results[2].1.is_err());
    }
}
