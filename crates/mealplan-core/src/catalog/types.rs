use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Food class used for meal-composition requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Beverage,
    Carb,
    Protein,
    Vegetable,
    Fruit,
    Fat,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 6] = [
        Self::Beverage,
        Self::Carb,
        Self::Protein,
        Self::Vegetable,
        Self::Fruit,
        Self::Fat,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Beverage => "beverage",
            Self::Carb => "carb",
            Self::Protein => "protein",
            Self::Vegetable => "vegetable",
            Self::Fruit => "fruit",
            Self::Fat => "fat",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beverage" => Ok(Self::Beverage),
            "carb" => Ok(Self::Carb),
            "protein" => Ok(Self::Protein),
            "vegetable" => Ok(Self::Vegetable),
            "fruit" => Ok(Self::Fruit),
            "fat" => Ok(Self::Fat),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Category`] string.
#[derive(Debug, Clone)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid food category: {:?}", self.0)
    }
}

impl std::error::Error for CategoryParseError {}

// ---------------------------------------------------------------------------

/// One of the five daily meal slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealType {
    /// All meal types in the order they are eaten during the day.
    pub const ALL: [MealType; 5] = [
        Self::Breakfast,
        Self::MorningSnack,
        Self::Lunch,
        Self::AfternoonSnack,
        Self::Dinner,
    ];

    /// Whether this slot is one of the two snacks.
    pub fn is_snack(self) -> bool {
        matches!(self, Self::MorningSnack | Self::AfternoonSnack)
    }

    /// Human-readable label, e.g. `Morning snack`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::MorningSnack => "Morning snack",
            Self::Lunch => "Lunch",
            Self::AfternoonSnack => "Afternoon snack",
            Self::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Breakfast => "breakfast",
            Self::MorningSnack => "morning_snack",
            Self::Lunch => "lunch",
            Self::AfternoonSnack => "afternoon_snack",
            Self::Dinner => "dinner",
        };
        f.write_str(s)
    }
}

impl FromStr for MealType {
    type Err = MealTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "morning_snack" => Ok(Self::MorningSnack),
            "lunch" => Ok(Self::Lunch),
            "afternoon_snack" => Ok(Self::AfternoonSnack),
            "dinner" => Ok(Self::Dinner),
            other => Err(MealTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`MealType`] string.
#[derive(Debug, Clone)]
pub struct MealTypeParseError(pub String);

impl fmt::Display for MealTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid meal type: {:?}", self.0)
    }
}

impl std::error::Error for MealTypeParseError {}

// ---------------------------------------------------------------------------
// Food rule
// ---------------------------------------------------------------------------

/// A validated catalog entry.
///
/// `min_portion`, `max_portion`, `required` and `frequency` are carried for
/// consumers of the catalog; the composer only ever serves
/// `standard_portion`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodRule {
    /// Unique catalog key (e.g. `chicken_breast`).
    pub id: String,
    /// Display name shown to users.
    pub name: String,
    /// Portion served by the composer, expressed in `unit`.
    pub standard_portion: f64,
    /// Unit label for the portion. Never converted.
    pub unit: String,
    pub calories_per_100g: f64,
    pub category: Category,
    /// Optional portion hint (e.g. `1 cup`).
    pub description: Option<String>,
    /// Meal slots this food may appear in. Never empty.
    pub meal_types: Vec<MealType>,
    pub min_portion: f64,
    pub max_portion: f64,
    pub required: bool,
    /// Maximum repeats per day.
    pub frequency: u32,
}

impl FoodRule {
    /// Whether this food may be served at `meal`.
    pub fn allowed_in(&self, meal: MealType) -> bool {
        self.meal_types.contains(&meal)
    }

    /// Calories of one standard portion, unrounded.
    pub fn standard_calories(&self) -> f64 {
        crate::compose::calories(self.standard_portion, self.calories_per_100g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_roundtrips_through_from_str() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn meal_type_display_roundtrips_through_from_str() {
        for meal in MealType::ALL {
            let parsed: MealType = meal.to_string().parse().unwrap();
            assert_eq!(parsed, meal);
        }
    }

    #[test]
    fn unknown_strings_are_rejected() {
        let err = "dessert".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "invalid food category: \"dessert\"");

        let err = "brunch".parse::<MealType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid meal type: \"brunch\"");
    }

    #[test]
    fn only_snacks_are_snacks() {
        let snacks: Vec<MealType> = MealType::ALL.into_iter().filter(|m| m.is_snack()).collect();
        assert_eq!(snacks, vec![MealType::MorningSnack, MealType::AfternoonSnack]);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&MealType::AfternoonSnack).unwrap();
        assert_eq!(json, "\"afternoon_snack\"");
        let json = serde_json::to_string(&Category::Vegetable).unwrap();
        assert_eq!(json, "\"vegetable\"");
    }
}
