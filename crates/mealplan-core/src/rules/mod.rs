//! Meal rule table: per-meal required categories and calorie ceilings.
//!
//! Like the catalog, the built-in table lives in an embedded TOML document
//! (`meal_rules.toml`). [`MealRuleTable::from_toml`] checks that the table is
//! consistent: every meal type has a rule and every required category has a
//! ceiling. Tables built by hand through [`MealRuleTable::insert`] skip those
//! checks, which lets tests describe deliberately inconsistent setups.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Category, MealType};

/// Errors that can occur while loading a meal rule table.
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("unknown meal type {0:?}")]
    UnknownMealType(String),

    #[error("invalid category {value:?} in rule for {meal}")]
    InvalidCategory { meal: MealType, value: String },

    #[error("no rule defined for {0}")]
    MissingMeal(MealType),

    #[error("category {category} listed twice as required for {meal}")]
    DuplicateRequired { meal: MealType, category: Category },

    #[error("required category {category} has no calorie ceiling for {meal}")]
    MissingCeiling { meal: MealType, category: Category },

    #[error("negative calorie ceiling {value} for {category} in {meal}")]
    NegativeCeiling {
        meal: MealType,
        category: Category,
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Declared nutrient floors and ceiling for a meal.
///
/// These are part of the configuration but the composer does not read them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTargets {
    #[serde(default)]
    pub min_protein_grams: f64,
    #[serde(default)]
    pub min_carbs_grams: f64,
    #[serde(default)]
    pub max_fat_grams: f64,
}

/// Composition rule for a single meal type.
///
/// Use [`MealRule::new`] for the required categories, then chain
/// [`MealRule::ceiling`] (builder-style) for each category limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealRule {
    /// Categories that must appear in the meal, in backfill order.
    pub required_categories: Vec<Category>,
    /// Maximum calories one user-chosen item of a category may contribute.
    pub category_ceilings: BTreeMap<Category, f64>,
    pub nutrients: NutrientTargets,
}

impl MealRule {
    pub fn new(required_categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            required_categories: required_categories.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the calorie ceiling for a category.
    pub fn ceiling(mut self, category: Category, calories: f64) -> Self {
        self.category_ceilings.insert(category, calories);
        self
    }

    /// Set the nutrient targets.
    pub fn nutrients(mut self, nutrients: NutrientTargets) -> Self {
        self.nutrients = nutrients;
        self
    }

    /// Ceiling for `category`, or `None` when none is configured.
    pub fn ceiling_for(&self, category: Category) -> Option<f64> {
        self.category_ceilings.get(&category).copied()
    }
}

#[derive(Debug, Deserialize)]
struct MealRuleToml {
    #[serde(default)]
    required_categories: Vec<String>,
    #[serde(default)]
    category_ceilings: BTreeMap<String, f64>,
    #[serde(flatten)]
    nutrients: NutrientTargets,
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// The embedded meal rules TOML.
static MEAL_RULES_TOML: &str = include_str!("meal_rules.toml");

static BUILTIN: OnceLock<MealRuleTable> = OnceLock::new();

/// Immutable mapping from meal type to its [`MealRule`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealRuleTable {
    rules: BTreeMap<MealType, MealRule>,
}

impl MealRuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a rule table document.
    pub fn from_toml(content: &str) -> Result<Self, RuleTableError> {
        let doc: BTreeMap<String, MealRuleToml> = toml::from_str(content)?;

        let mut table = Self::new();
        for (key, raw) in doc {
            let meal = key
                .parse::<MealType>()
                .map_err(|_| RuleTableError::UnknownMealType(key.clone()))?;
            table.insert(meal, parse_rule(meal, raw)?);
        }

        table.validate()?;
        Ok(table)
    }

    /// The process-wide built-in table, parsed once on first use.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed or inconsistent.
    pub fn builtin() -> &'static MealRuleTable {
        BUILTIN.get_or_init(|| {
            MealRuleTable::from_toml(MEAL_RULES_TOML).expect("embedded meal_rules.toml is invalid")
        })
    }

    /// Insert or replace the rule for `meal`. No consistency checks.
    pub fn insert(&mut self, meal: MealType, rule: MealRule) -> Option<MealRule> {
        self.rules.insert(meal, rule)
    }

    pub fn get(&self, meal: MealType) -> Option<&MealRule> {
        self.rules.get(&meal)
    }

    /// Check that every meal type has a rule and every required category a
    /// ceiling.
    pub fn validate(&self) -> Result<(), RuleTableError> {
        for meal in MealType::ALL {
            let rule = self.get(meal).ok_or(RuleTableError::MissingMeal(meal))?;
            for &category in &rule.required_categories {
                if rule.ceiling_for(category).is_none() {
                    return Err(RuleTableError::MissingCeiling { meal, category });
                }
            }
        }
        Ok(())
    }
}

fn parse_rule(meal: MealType, raw: MealRuleToml) -> Result<MealRule, RuleTableError> {
    let parse_category = |value: &str| {
        value
            .parse::<Category>()
            .map_err(|_| RuleTableError::InvalidCategory {
                meal,
                value: value.to_owned(),
            })
    };

    let mut required = Vec::with_capacity(raw.required_categories.len());
    for value in &raw.required_categories {
        let category = parse_category(value)?;
        if required.contains(&category) {
            return Err(RuleTableError::DuplicateRequired { meal, category });
        }
        required.push(category);
    }

    let mut rule = MealRule::new(required).nutrients(raw.nutrients);
    for (value, calories) in &raw.category_ceilings {
        let category = parse_category(value)?;
        if *calories < 0.0 {
            return Err(RuleTableError::NegativeCeiling {
                meal,
                category,
                value: *calories,
            });
        }
        rule = rule.ceiling(category, *calories);
    }

    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_every_meal() {
        let table = MealRuleTable::builtin();
        for meal in MealType::ALL {
            assert!(table.get(meal).is_some(), "missing rule for {meal}");
        }
    }

    #[test]
    fn builtin_breakfast_rule() {
        let rule = MealRuleTable::builtin().get(MealType::Breakfast).unwrap();
        assert_eq!(
            rule.required_categories,
            vec![Category::Beverage, Category::Carb, Category::Protein]
        );
        assert_eq!(rule.ceiling_for(Category::Beverage), Some(50.0));
        assert_eq!(rule.ceiling_for(Category::Vegetable), None);
        assert_eq!(rule.nutrients.min_protein_grams, 15.0);
    }

    #[test]
    fn builtin_dinner_keeps_declared_order() {
        let rule = MealRuleTable::builtin().get(MealType::Dinner).unwrap();
        assert_eq!(
            rule.required_categories,
            vec![Category::Protein, Category::Vegetable, Category::Carb]
        );
    }

    #[test]
    fn snacks_share_the_same_rule() {
        let table = MealRuleTable::builtin();
        assert_eq!(
            table.get(MealType::MorningSnack),
            table.get(MealType::AfternoonSnack)
        );
    }

    #[test]
    fn unknown_meal_key_is_rejected() {
        let err = MealRuleTable::from_toml("[brunch]\nrequired_categories = []\n").unwrap_err();
        assert!(matches!(err, RuleTableError::UnknownMealType(ref k) if k == "brunch"), "got: {err}");
    }

    #[test]
    fn missing_meal_is_rejected() {
        let err = MealRuleTable::from_toml("[breakfast]\nrequired_categories = []\n").unwrap_err();
        assert!(
            matches!(err, RuleTableError::MissingMeal(MealType::MorningSnack)),
            "got: {err}"
        );
    }

    #[test]
    fn required_category_without_ceiling_is_rejected() {
        let doc = MEAL_RULES_TOML.replace("beverage = 50.0\n", "");
        let err = MealRuleTable::from_toml(&doc).unwrap_err();
        assert!(
            matches!(
                err,
                RuleTableError::MissingCeiling {
                    meal: MealType::Breakfast,
                    category: Category::Beverage
                }
            ),
            "got: {err}"
        );
    }

    #[test]
    fn invalid_category_is_rejected() {
        let doc = MEAL_RULES_TOML.replace("fat = 150.0", "sugar = 150.0");
        let err = MealRuleTable::from_toml(&doc).unwrap_err();
        assert!(
            matches!(err, RuleTableError::InvalidCategory { meal: MealType::Lunch, .. }),
            "got: {err}"
        );
    }

    #[test]
    fn negative_ceiling_is_rejected() {
        let doc = MEAL_RULES_TOML.replace("vegetable = 100.0", "vegetable = -1.0");
        let err = MealRuleTable::from_toml(&doc).unwrap_err();
        assert!(matches!(err, RuleTableError::NegativeCeiling { .. }), "got: {err}");
    }

    #[test]
    fn duplicate_required_category_is_rejected() {
        let doc = MEAL_RULES_TOML.replace(
            "required_categories = [\"carb\", \"protein\", \"vegetable\"]",
            "required_categories = [\"carb\", \"carb\"]",
        );
        let err = MealRuleTable::from_toml(&doc).unwrap_err();
        assert!(matches!(err, RuleTableError::DuplicateRequired { .. }), "got: {err}");
    }

    #[test]
    fn hand_built_tables_skip_validation() {
        let mut table = MealRuleTable::new();
        table.insert(MealType::Lunch, MealRule::new([Category::Carb]));
        assert!(table.get(MealType::Lunch).unwrap().ceiling_for(Category::Carb).is_none());
        assert!(table.validate().is_err());
    }
}
