//! Shared test utilities for mealplan tests.
//!
//! Provides a small fixture catalog and rule table that are easy to reason
//! about by hand, seeded random sources, and assertions for the properties
//! every composed meal must satisfy.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use mealplan_core::compose::calories;
use mealplan_core::{Catalog, DayPlan, ItemSource, MealResult, MealRule, MealRuleTable, MealType};

/// Fixture catalog. Calories per standard portion are noted on each entry.
pub const FIXTURE_CATALOG_TOML: &str = r#"
[[foods]]
id = "tea"            # 2 kcal
name = "Tea"
standard_portion = 200.0
unit = "ml"
calories_per_100g = 1.0
category = "beverage"
meal_types = ["breakfast"]

[[foods]]
id = "toast"          # 100 kcal
name = "Toast"
standard_portion = 40.0
unit = "g"
calories_per_100g = 250.0
category = "carb"
meal_types = ["breakfast", "morning_snack", "afternoon_snack"]

[[foods]]
id = "rice"           # 350 kcal
name = "Rice"
standard_portion = 100.0
unit = "g"
calories_per_100g = 350.0
category = "carb"
meal_types = ["lunch", "dinner"]

[[foods]]
id = "egg"            # 70 kcal
name = "Egg"
standard_portion = 50.0
unit = "g"
calories_per_100g = 140.0
category = "protein"
meal_types = ["breakfast"]

[[foods]]
id = "steak"          # 500 kcal
name = "Steak"
standard_portion = 200.0
unit = "g"
calories_per_100g = 250.0
category = "protein"
meal_types = ["lunch", "dinner"]

[[foods]]
id = "tofu"           # 120 kcal
name = "Tofu"
standard_portion = 150.0
unit = "g"
calories_per_100g = 80.0
category = "protein"
meal_types = ["lunch", "dinner"]

[[foods]]
id = "spinach"        # 46 kcal
name = "Spinach"
standard_portion = 200.0
unit = "g"
calories_per_100g = 23.0
category = "vegetable"
meal_types = ["lunch", "dinner"]

[[foods]]
id = "fresh_fruit"    # 75 kcal
name = "Fresh fruit"
standard_portion = 150.0
unit = "g"
calories_per_100g = 50.0
category = "fruit"
meal_types = ["breakfast", "morning_snack", "afternoon_snack"]

[[foods]]
id = "wholegrain_crackers"  # 129 kcal
name = "Wholegrain crackers"
standard_portion = 30.0
unit = "g"
calories_per_100g = 430.0
category = "carb"
meal_types = ["morning_snack", "afternoon_snack"]

[[foods]]
id = "olive_oil"      # 90 kcal
name = "Olive oil"
standard_portion = 10.0
unit = "ml"
calories_per_100g = 900.0
category = "fat"
meal_types = ["lunch", "dinner"]
"#;

/// Parse [`FIXTURE_CATALOG_TOML`].
pub fn fixture_catalog() -> Catalog {
    Catalog::from_toml(FIXTURE_CATALOG_TOML).expect("fixture catalog should parse")
}

/// Rule table paired with [`fixture_catalog`].
///
/// Ceilings are chosen so that `steak` is over the protein ceiling at lunch
/// and dinner while `tofu` is under it.
pub fn fixture_rules() -> MealRuleTable {
    use mealplan_core::Category::*;

    let mut table = MealRuleTable::new();
    table.insert(
        MealType::Breakfast,
        MealRule::new([Beverage, Carb, Protein])
            .ceiling(Beverage, 50.0)
            .ceiling(Carb, 200.0)
            .ceiling(Protein, 150.0),
    );
    for snack in [MealType::MorningSnack, MealType::AfternoonSnack] {
        table.insert(
            snack,
            MealRule::new([Fruit, Carb])
                .ceiling(Fruit, 100.0)
                .ceiling(Carb, 150.0),
        );
    }
    for meal in [MealType::Lunch, MealType::Dinner] {
        table.insert(
            meal,
            MealRule::new([Carb, Protein, Vegetable])
                .ceiling(Carb, 400.0)
                .ceiling(Protein, 300.0)
                .ceiling(Vegetable, 100.0)
                .ceiling(Fat, 100.0),
        );
    }
    table
}

/// Deterministic random source.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Assert the properties every composed meal must satisfy:
///
/// - the unrounded total never exceeds the target (or zero, for a
///   non-positive target), and the rounded total matches it;
/// - each item's calories match its catalog entry's standard portion;
/// - at most one preferred item per category;
/// - `missing_categories` and `complete` agree.
pub fn assert_meal_invariants(catalog: &Catalog, meal: &MealResult) {
    assert!(
        meal.exact_calories() <= meal.target_calories.max(0.0),
        "total {} over target {}",
        meal.exact_calories(),
        meal.target_calories
    );
    assert_eq!(meal.calories, meal.exact_calories().round() as i64);

    let mut preferred_categories = HashSet::new();
    for item in &meal.items {
        let rule = catalog
            .get(&item.id)
            .unwrap_or_else(|| panic!("item {:?} not in catalog", item.id));
        assert_eq!(item.name, rule.name);
        assert_eq!(item.quantity, rule.standard_portion);
        assert_eq!(item.unit, rule.unit);
        assert_eq!(
            item.calories,
            calories(rule.standard_portion, rule.calories_per_100g).round() as i64,
            "calories of {:?}",
            item.id
        );
        if item.source == ItemSource::Preferred {
            assert!(
                preferred_categories.insert(rule.category),
                "two preferred items of category {}",
                rule.category
            );
        }
    }

    assert_eq!(meal.complete, meal.missing_categories.is_empty());
}

/// [`assert_meal_invariants`] for every meal of a plan, plus the plan total.
pub fn assert_plan_invariants(catalog: &Catalog, plan: &DayPlan) {
    for (_, meal) in plan.meals() {
        assert_meal_invariants(catalog, meal);
    }
    let sum: i64 = plan.meals().map(|(_, m)| m.calories).sum();
    assert_eq!(plan.total_calories, sum);
}
