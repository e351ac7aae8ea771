//! Ingredient listing: what a user can pick for each meal, grouped for
//! display.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, Category, MealType};

/// Display group shown to users when picking ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DisplayGroup {
    Beverages,
    Carbs,
    Proteins,
    Vegetables,
    Fruit,
    Snacks,
    Extras,
}

impl DisplayGroup {
    /// Groups in presentation order.
    pub const ORDER: [DisplayGroup; 7] = [
        Self::Beverages,
        Self::Carbs,
        Self::Proteins,
        Self::Vegetables,
        Self::Fruit,
        Self::Snacks,
        Self::Extras,
    ];

    /// Group a catalog category is listed under.
    ///
    /// No category maps to [`DisplayGroup::Snacks`]; the group is reserved
    /// and never appears in a listing.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Beverage => Self::Beverages,
            Category::Carb => Self::Carbs,
            Category::Protein => Self::Proteins,
            Category::Vegetable => Self::Vegetables,
            Category::Fruit => Self::Fruit,
            Category::Fat => Self::Extras,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientGroup {
    pub name: DisplayGroup,
    /// Catalog ids, sorted alphabetically.
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealIngredients {
    pub meal: MealType,
    pub label: &'static str,
    /// Non-empty groups in [`DisplayGroup::ORDER`].
    pub categories: Vec<IngredientGroup>,
}

/// List the ingredients available for every meal, in day order.
pub fn list_ingredients(catalog: &Catalog) -> Vec<MealIngredients> {
    MealType::ALL
        .into_iter()
        .map(|meal| ingredients_for_meal(catalog, meal))
        .collect()
}

/// List the ingredients available for one meal.
pub fn ingredients_for_meal(catalog: &Catalog, meal: MealType) -> MealIngredients {
    let mut groups: BTreeMap<DisplayGroup, Vec<String>> = BTreeMap::new();
    for rule in catalog.iter().filter(|rule| rule.allowed_in(meal)) {
        groups
            .entry(DisplayGroup::for_category(rule.category))
            .or_default()
            .push(rule.id.clone());
    }

    // BTreeMap iteration follows the enum's declaration order, which is
    // DisplayGroup::ORDER.
    let categories = groups
        .into_iter()
        .map(|(name, mut ingredients)| {
            ingredients.sort();
            IngredientGroup { name, ingredients }
        })
        .collect();

    MealIngredients {
        meal,
        label: meal.label(),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_names(listing: &MealIngredients) -> Vec<DisplayGroup> {
        listing.categories.iter().map(|g| g.name).collect()
    }

    #[test]
    fn lists_every_meal_in_day_order() {
        let listing = list_ingredients(Catalog::builtin());
        let meals: Vec<MealType> = listing.iter().map(|m| m.meal).collect();
        assert_eq!(meals, MealType::ALL.to_vec());
    }

    #[test]
    fn breakfast_groups_follow_display_order() {
        let breakfast = ingredients_for_meal(Catalog::builtin(), MealType::Breakfast);
        assert_eq!(
            group_names(&breakfast),
            vec![
                DisplayGroup::Beverages,
                DisplayGroup::Carbs,
                DisplayGroup::Proteins,
                DisplayGroup::Fruit
            ]
        );
        assert_eq!(
            breakfast.categories[0].ingredients,
            vec!["ace_diet_drink", "coffee", "orange_juice"]
        );
    }

    #[test]
    fn ingredients_are_sorted_and_unique() {
        for meal in list_ingredients(Catalog::builtin()) {
            for group in &meal.categories {
                let mut sorted = group.ingredients.clone();
                sorted.sort();
                sorted.dedup();
                assert_eq!(sorted, group.ingredients, "{} / {:?}", meal.meal, group.name);
            }
        }
    }

    #[test]
    fn snacks_group_never_appears() {
        for meal in list_ingredients(Catalog::builtin()) {
            assert!(!group_names(&meal).contains(&DisplayGroup::Snacks));
            assert!(meal.categories.iter().all(|g| !g.ingredients.is_empty()));
        }
    }

    #[test]
    fn morning_snack_offers_fruit_and_crackers() {
        let snack = ingredients_for_meal(Catalog::builtin(), MealType::MorningSnack);
        assert_eq!(group_names(&snack), vec![DisplayGroup::Carbs, DisplayGroup::Fruit]);
        assert_eq!(snack.categories[0].ingredients, vec!["wholegrain_crackers"]);
        assert_eq!(snack.categories[1].ingredients, vec!["fresh_fruit"]);
    }
}
