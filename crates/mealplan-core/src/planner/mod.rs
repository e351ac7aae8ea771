//! Day planner: splits a daily calorie target across the five meals and
//! composes each one independently.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::MealType;
use crate::compose::{Composer, MealResult};

/// Tolerance used when checking that split fractions sum to one.
const SPLIT_TOLERANCE: f64 = 1e-9;

/// Errors from an invalid [`DaySplit`].
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("fraction for {meal} is negative or not finite: {value}")]
    InvalidFraction { meal: MealType, value: f64 },

    #[error("meal fractions must sum to 1.0, got {0}")]
    BadSum(f64),
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// Share of the daily calorie target given to each meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DaySplit {
    pub breakfast: f64,
    pub morning_snack: f64,
    pub lunch: f64,
    pub afternoon_snack: f64,
    pub dinner: f64,
}

impl DaySplit {
    /// 25 / 10 / 35 / 10 / 20.
    pub const STANDARD: DaySplit = DaySplit {
        breakfast: 0.25,
        morning_snack: 0.10,
        lunch: 0.35,
        afternoon_snack: 0.10,
        dinner: 0.20,
    };

    pub fn fraction(&self, meal: MealType) -> f64 {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::MorningSnack => self.morning_snack,
            MealType::Lunch => self.lunch,
            MealType::AfternoonSnack => self.afternoon_snack,
            MealType::Dinner => self.dinner,
        }
    }

    /// Calorie target for `meal` out of `daily_target`.
    pub fn target(&self, meal: MealType, daily_target: f64) -> f64 {
        daily_target * self.fraction(meal)
    }

    pub fn validate(&self) -> Result<(), SplitError> {
        let mut sum = 0.0;
        for meal in MealType::ALL {
            let value = self.fraction(meal);
            if !value.is_finite() || value < 0.0 {
                return Err(SplitError::InvalidFraction { meal, value });
            }
            sum += value;
        }
        if (sum - 1.0).abs() > SPLIT_TOLERANCE {
            return Err(SplitError::BadSum(sum));
        }
        Ok(())
    }
}

impl Default for DaySplit {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ---------------------------------------------------------------------------
// Day plan
// ---------------------------------------------------------------------------

/// Five composed meals for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub breakfast: MealResult,
    pub morning_snack: MealResult,
    pub lunch: MealResult,
    pub afternoon_snack: MealResult,
    pub dinner: MealResult,
    /// Sum of the rounded meal totals.
    pub total_calories: i64,
    pub target_calories: f64,
}

impl DayPlan {
    pub fn meal(&self, meal: MealType) -> &MealResult {
        match meal {
            MealType::Breakfast => &self.breakfast,
            MealType::MorningSnack => &self.morning_snack,
            MealType::Lunch => &self.lunch,
            MealType::AfternoonSnack => &self.afternoon_snack,
            MealType::Dinner => &self.dinner,
        }
    }

    /// Meals in day order.
    pub fn meals(&self) -> impl Iterator<Item = (MealType, &MealResult)> {
        MealType::ALL.into_iter().map(move |meal| (meal, self.meal(meal)))
    }

    /// Whether every meal has all of its required categories.
    pub fn is_complete(&self) -> bool {
        self.meals().all(|(_, result)| result.complete)
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Builds [`DayPlan`]s with a fixed [`DaySplit`].
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    composer: Composer<'a>,
    split: DaySplit,
}

impl Planner<'static> {
    /// Planner over the built-in catalog and rules with the standard split.
    pub fn builtin() -> Self {
        Self {
            composer: Composer::builtin(),
            split: DaySplit::STANDARD,
        }
    }
}

impl<'a> Planner<'a> {
    pub fn new(composer: Composer<'a>, split: DaySplit) -> Result<Self, SplitError> {
        split.validate()?;
        Ok(Self { composer, split })
    }

    pub fn composer(&self) -> &Composer<'a> {
        &self.composer
    }

    pub fn split(&self) -> &DaySplit {
        &self.split
    }

    /// Compose all five meals, drawing backfill choices from `rng`.
    pub fn plan_day_with<S, R>(&self, ingredients: &[S], daily_target: f64, rng: &mut R) -> DayPlan
    where
        S: AsRef<str>,
        R: Rng,
    {
        let mut compose = |meal: MealType| {
            self.composer
                .compose(meal, ingredients, self.split.target(meal, daily_target), &mut *rng)
        };

        let breakfast = compose(MealType::Breakfast);
        let morning_snack = compose(MealType::MorningSnack);
        let lunch = compose(MealType::Lunch);
        let afternoon_snack = compose(MealType::AfternoonSnack);
        let dinner = compose(MealType::Dinner);

        let total_calories = [&breakfast, &morning_snack, &lunch, &afternoon_snack, &dinner]
            .iter()
            .map(|m| m.calories)
            .sum();

        DayPlan {
            breakfast,
            morning_snack,
            lunch,
            afternoon_snack,
            dinner,
            total_calories,
            target_calories: daily_target,
        }
    }

    /// Reproducible plan: the same seed and inputs always give the same plan.
    pub fn plan_day_seeded<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        daily_target: f64,
        seed: u64,
    ) -> DayPlan {
        self.plan_day_with(ingredients, daily_target, &mut StdRng::seed_from_u64(seed))
    }

    /// Plan with a fresh OS-seeded generator scoped to this call.
    pub fn plan_day<S: AsRef<str>>(&self, ingredients: &[S], daily_target: f64) -> DayPlan {
        self.plan_day_with(ingredients, daily_target, &mut StdRng::from_os_rng())
    }
}
