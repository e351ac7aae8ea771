//! Meal plan composition.
//!
//! ```text
//! Planner --(meal, fraction x daily target)--> Composer
//!                                                 |
//!                                   Catalog + MealRuleTable
//!                                                 |
//!                                            MealResult x 5 --> DayPlan
//! ```

pub mod catalog;
pub mod compose;
pub mod ingredients;
pub mod planner;
pub mod rules;

pub use catalog::{Catalog, CatalogError, Category, FoodRule, MealType};
pub use compose::{Composer, ItemSource, MealResult, SelectedItem};
pub use ingredients::{MealIngredients, list_ingredients};
pub use planner::{DayPlan, DaySplit, Planner, SplitError};
pub use rules::{MealRule, MealRuleTable, RuleTableError};
