use serde::Serialize;

use crate::catalog::{Category, FoodRule};

use super::calories::round_calories;

/// Which pass of the composer contributed an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    /// Taken from the user's ingredient list.
    Preferred,
    /// Drawn at random to fill a missing required category.
    Backfill,
    /// Added because a snack would otherwise be empty.
    SnackFallback,
}

/// One food placed in a meal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedItem {
    /// Catalog id of the food this item was built from.
    pub id: String,
    pub name: String,
    /// Always the food's standard portion.
    pub quantity: f64,
    pub unit: String,
    /// Calories of the portion, rounded to the nearest integer.
    pub calories: i64,
    pub source: ItemSource,
}

impl SelectedItem {
    pub fn from_rule(rule: &FoodRule, source: ItemSource) -> Self {
        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            quantity: rule.standard_portion,
            unit: rule.unit.clone(),
            calories: round_calories(rule.standard_calories()),
            source,
        }
    }
}

/// The composed content of one meal.
///
/// An under-filled meal is still a valid result: `missing_categories` lists
/// the required categories that could not be placed within the budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealResult {
    pub items: Vec<SelectedItem>,
    /// Rounded running total of the meal.
    pub calories: i64,
    /// Calorie budget the meal was composed against.
    pub target_calories: f64,
    pub missing_categories: Vec<Category>,
    /// `true` when every required category is present.
    pub complete: bool,
    #[serde(skip)]
    pub(crate) exact_calories: f64,
}

impl MealResult {
    /// Unrounded running total. Never above `target_calories`.
    pub fn exact_calories(&self) -> f64 {
        self.exact_calories
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items contributed by the given pass.
    pub fn items_from(&self, source: ItemSource) -> impl Iterator<Item = &SelectedItem> {
        self.items.iter().filter(move |item| item.source == source)
    }
}
