//! Food catalog: the immutable table of food rules keyed by ingredient id.
//!
//! The built-in catalog is defined in `catalog.toml` and embedded in the
//! binary at compile time. [`Catalog::from_toml`] parses and validates any
//! document in the same format, which is how tests build small fixtures.

mod types;

pub use types::{Category, CategoryParseError, FoodRule, MealType, MealTypeParseError};

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("catalog must contain at least one food")]
    Empty,

    #[error("duplicate food id: {0:?}")]
    DuplicateId(String),

    #[error("duplicate food name {name:?} (on {id:?})")]
    DuplicateName { id: String, name: String },

    #[error("invalid category {value:?} on food {id:?}")]
    InvalidCategory { id: String, value: String },

    #[error("invalid meal type {value:?} on food {id:?}")]
    InvalidMealType { id: String, value: String },

    #[error("food {0:?} is not allowed in any meal")]
    NoMealTypes(String),

    #[error("food {id:?} has non-positive standard portion {value}")]
    InvalidPortion { id: String, value: f64 },

    #[error("food {id:?} has negative calories per 100g {value}")]
    NegativeCalories { id: String, value: f64 },

    #[error("food {id:?} has min portion {min} above max portion {max}")]
    PortionBounds { id: String, min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// TOML format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogToml {
    #[serde(default)]
    foods: Vec<FoodToml>,
}

#[derive(Debug, Deserialize)]
struct FoodToml {
    id: String,
    name: String,
    standard_portion: f64,
    unit: String,
    calories_per_100g: f64,
    category: String,
    #[serde(default)]
    description: Option<String>,
    meal_types: Vec<String>,
    /// Defaults to `standard_portion` when absent.
    #[serde(default)]
    min_portion: Option<f64>,
    /// Defaults to `standard_portion` when absent.
    #[serde(default)]
    max_portion: Option<f64>,
    #[serde(default)]
    required: bool,
    #[serde(default = "default_frequency")]
    frequency: u32,
}

fn default_frequency() -> u32 {
    1
}

impl FoodToml {
    fn into_rule(self) -> Result<FoodRule, CatalogError> {
        let category = self
            .category
            .parse::<Category>()
            .map_err(|_| CatalogError::InvalidCategory {
                id: self.id.clone(),
                value: self.category.clone(),
            })?;

        if self.meal_types.is_empty() {
            return Err(CatalogError::NoMealTypes(self.id));
        }
        let mut meal_types = Vec::with_capacity(self.meal_types.len());
        for value in &self.meal_types {
            let meal = value
                .parse::<MealType>()
                .map_err(|_| CatalogError::InvalidMealType {
                    id: self.id.clone(),
                    value: value.clone(),
                })?;
            if !meal_types.contains(&meal) {
                meal_types.push(meal);
            }
        }

        if self.standard_portion <= 0.0 || self.standard_portion.is_nan() {
            return Err(CatalogError::InvalidPortion {
                id: self.id,
                value: self.standard_portion,
            });
        }
        if self.calories_per_100g < 0.0 || self.calories_per_100g.is_nan() {
            return Err(CatalogError::NegativeCalories {
                id: self.id,
                value: self.calories_per_100g,
            });
        }

        let min_portion = self.min_portion.unwrap_or(self.standard_portion);
        let max_portion = self.max_portion.unwrap_or(self.standard_portion);
        if min_portion > max_portion {
            return Err(CatalogError::PortionBounds {
                id: self.id,
                min: min_portion,
                max: max_portion,
            });
        }

        Ok(FoodRule {
            id: self.id,
            name: self.name,
            standard_portion: self.standard_portion,
            unit: self.unit,
            calories_per_100g: self.calories_per_100g,
            category,
            description: self.description.filter(|d| !d.is_empty()),
            meal_types,
            min_portion,
            max_portion,
            required: self.required,
            frequency: self.frequency,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The embedded catalog TOML.
static CATALOG_TOML: &str = include_str!("catalog.toml");

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

/// Immutable table of food rules, keyed by ingredient id.
///
/// Iteration is in id order so that candidate lists (and therefore seeded
/// random draws) are reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    foods: BTreeMap<String, FoodRule>,
}

impl Catalog {
    /// Parse and validate a catalog document.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let doc: CatalogToml = toml::from_str(content)?;
        Self::from_rules(
            doc.foods
                .into_iter()
                .map(FoodToml::into_rule)
                .collect::<Result<Vec<_>, _>>()?,
        )
    }

    /// Build a catalog from already-typed rules, enforcing id and name
    /// uniqueness.
    pub fn from_rules(rules: Vec<FoodRule>) -> Result<Self, CatalogError> {
        if rules.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut names = HashSet::new();
        let mut foods = BTreeMap::new();
        for rule in rules {
            if !names.insert(rule.name.clone()) {
                return Err(CatalogError::DuplicateName {
                    id: rule.id,
                    name: rule.name,
                });
            }
            if foods.contains_key(&rule.id) {
                return Err(CatalogError::DuplicateId(rule.id));
            }
            foods.insert(rule.id.clone(), rule);
        }

        Ok(Self { foods })
    }

    /// The process-wide built-in catalog, parsed once on first use.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. This is a build-time
    /// invariant covered by the tests below.
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(|| {
            Catalog::from_toml(CATALOG_TOML).expect("embedded catalog.toml is invalid")
        })
    }

    /// Look up a food by id.
    pub fn get(&self, id: &str) -> Option<&FoodRule> {
        self.foods.get(id)
    }

    /// All foods, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &FoodRule> {
        self.foods.values()
    }

    /// Foods of `category` that may be served at `meal`, in id order.
    pub fn eligible(&self, category: Category, meal: MealType) -> Vec<&FoodRule> {
        self.foods
            .values()
            .filter(|rule| rule.category == category && rule.allowed_in(meal))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[[foods]]
id = "coffee"
name = "Coffee"
standard_portion = 30.0
unit = "g"
calories_per_100g = 1.0
category = "beverage"
meal_types = ["breakfast"]
"#;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 33);
        assert!(catalog.get("coffee").is_some());
        assert!(catalog.get("fresh_fruit").is_some());
        assert!(catalog.get("wholegrain_crackers").is_some());
    }

    #[test]
    fn builtin_catalog_is_shared() {
        assert!(std::ptr::eq(Catalog::builtin(), Catalog::builtin()));
    }

    #[test]
    fn builtin_coffee_is_a_low_calorie_beverage() {
        let coffee = Catalog::builtin().get("coffee").unwrap();
        assert_eq!(coffee.category, Category::Beverage);
        assert!((coffee.standard_calories() - 0.3).abs() < 1e-9);
        assert_eq!(coffee.meal_types, vec![MealType::Breakfast]);
    }

    #[test]
    fn minimal_entry_gets_defaults() {
        let catalog = Catalog::from_toml(MINIMAL).expect("should parse");
        let coffee = catalog.get("coffee").unwrap();
        assert_eq!(coffee.min_portion, 30.0);
        assert_eq!(coffee.max_portion, 30.0);
        assert_eq!(coffee.frequency, 1);
        assert!(!coffee.required);
        assert!(coffee.description.is_none());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Catalog::from_toml("").unwrap_err();
        assert!(matches!(err, CatalogError::Empty), "got: {err}");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let doc = format!("{MINIMAL}{}", MINIMAL.replace("\"Coffee\"", "\"Espresso\""));
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "coffee"), "got: {err}");
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let doc = format!("{MINIMAL}{}", MINIMAL.replace("\"coffee\"", "\"espresso\""));
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName { .. }), "got: {err}");
    }

    #[test]
    fn invalid_category_is_rejected() {
        let doc = MINIMAL.replace("\"beverage\"", "\"dessert\"");
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(
            matches!(err, CatalogError::InvalidCategory { ref value, .. } if value == "dessert"),
            "got: {err}"
        );
    }

    #[test]
    fn invalid_meal_type_is_rejected() {
        let doc = MINIMAL.replace("[\"breakfast\"]", "[\"brunch\"]");
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMealType { .. }), "got: {err}");
    }

    #[test]
    fn empty_meal_types_are_rejected() {
        let doc = MINIMAL.replace("[\"breakfast\"]", "[]");
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::NoMealTypes(_)), "got: {err}");
    }

    #[test]
    fn zero_portion_is_rejected() {
        let doc = MINIMAL.replace("standard_portion = 30.0", "standard_portion = 0.0");
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPortion { .. }), "got: {err}");
    }

    #[test]
    fn negative_calories_are_rejected() {
        let doc = MINIMAL.replace("calories_per_100g = 1.0", "calories_per_100g = -1.0");
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::NegativeCalories { .. }), "got: {err}");
    }

    #[test]
    fn inverted_portion_bounds_are_rejected() {
        let doc = format!("{MINIMAL}min_portion = 50.0\nmax_portion = 40.0\n");
        let err = Catalog::from_toml(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::PortionBounds { .. }), "got: {err}");
    }

    #[test]
    fn eligible_filters_by_category_and_meal_in_id_order() {
        let catalog = Catalog::builtin();
        let ids: Vec<&str> = catalog
            .eligible(Category::Beverage, MealType::Breakfast)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ace_diet_drink", "coffee", "orange_juice"]);

        assert!(catalog.eligible(Category::Beverage, MealType::Dinner).is_empty());
        assert!(catalog.eligible(Category::Fat, MealType::Lunch).is_empty());
    }

    #[test]
    fn every_builtin_meal_type_has_a_carb() {
        let catalog = Catalog::builtin();
        for meal in MealType::ALL {
            assert!(
                !catalog.eligible(Category::Carb, meal).is_empty(),
                "no carb available for {meal}"
            );
        }
    }
}
