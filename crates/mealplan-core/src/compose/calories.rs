//! Calorie arithmetic and category queries over a partial selection.

use crate::catalog::{Catalog, Category};

use super::types::SelectedItem;

/// Calories in `quantity` of a food with `calories_per_100g`.
///
/// Unrounded; rounding only happens when a value is stored in a
/// [`SelectedItem`] or a meal total.
pub fn calories(quantity: f64, calories_per_100g: f64) -> f64 {
    quantity * calories_per_100g / 100.0
}

/// Round a calorie value to the nearest whole number.
pub(crate) fn round_calories(value: f64) -> i64 {
    value.round() as i64
}

/// Whether any item in `items` comes from a catalog entry of `category`.
///
/// Items are resolved through the catalog id they retain. Items whose id is
/// not in `catalog` never match.
pub fn category_present(catalog: &Catalog, items: &[SelectedItem], category: Category) -> bool {
    items
        .iter()
        .any(|item| item_category(catalog, item) == Some(category))
}

/// Sum of the rounded calories of items belonging to `category`.
pub fn category_calories(catalog: &Catalog, items: &[SelectedItem], category: Category) -> i64 {
    items
        .iter()
        .filter(|item| item_category(catalog, item) == Some(category))
        .map(|item| item.calories)
        .sum()
}

fn item_category(catalog: &Catalog, item: &SelectedItem) -> Option<Category> {
    catalog.get(&item.id).map(|rule| rule.category)
}
