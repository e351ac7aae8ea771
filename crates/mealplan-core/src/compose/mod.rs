//! Meal composer: turns a user ingredient wishlist into one meal under a
//! calorie budget.
//!
//! Composition runs in three passes over a single running total:
//!
//! 1. **Preferred**: user ingredients, in the order given, at most one per
//!    category, each under its category ceiling.
//! 2. **Backfill**: for every required category still absent, one eligible
//!    catalog entry drawn uniformly at random.
//! 3. **Snack fallback**: an empty snack gets fresh fruit, then crackers.
//!
//! Every insertion is a budgeted add: it only happens when the running total
//! stays at or under the target. Nothing in here fails; a meal that cannot be
//! filled comes back with fewer items and its gaps listed in
//! [`MealResult::missing_categories`].

mod calories;
mod types;

pub use calories::{calories, category_calories, category_present};
pub use types::{ItemSource, MealResult, SelectedItem};

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use crate::catalog::{Catalog, Category, FoodRule, MealType};
use crate::rules::{MealRule, MealRuleTable};

use calories::round_calories;

/// Catalog id tried first when a snack is still empty.
pub const SNACK_FALLBACK_FRUIT: &str = "fresh_fruit";
/// Catalog id tried second when a snack is still empty.
pub const SNACK_FALLBACK_CARB: &str = "wholegrain_crackers";

/// Rule used when the table has no entry for a meal: no required categories
/// and no ceilings, so only the snack fallback can add anything.
static EMPTY_RULE: MealRule = MealRule {
    required_categories: Vec::new(),
    category_ceilings: std::collections::BTreeMap::new(),
    nutrients: crate::rules::NutrientTargets {
        min_protein_grams: 0.0,
        min_carbs_grams: 0.0,
        max_fat_grams: 0.0,
    },
};

/// Composes meals from a catalog and a rule table.
///
/// Holds only shared references, so one composer can serve any number of
/// concurrent callers; each call brings its own random source.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    catalog: &'a Catalog,
    rules: &'a MealRuleTable,
}

impl Composer<'static> {
    /// Composer over the built-in catalog and rule table.
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin(), MealRuleTable::builtin())
    }
}

impl<'a> Composer<'a> {
    pub fn new(catalog: &'a Catalog, rules: &'a MealRuleTable) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn rules(&self) -> &'a MealRuleTable {
        self.rules
    }

    /// Compose one meal.
    ///
    /// `ingredients` may contain unknown or duplicate ids; both are ignored.
    /// A non-positive `target` leaves no room for any food with calories.
    pub fn compose<S, R>(
        &self,
        meal: MealType,
        ingredients: &[S],
        target: f64,
        rng: &mut R,
    ) -> MealResult
    where
        S: AsRef<str>,
        R: Rng,
    {
        let rule = self.rules.get(meal).unwrap_or(&EMPTY_RULE);
        let mut draft = MealDraft::new(meal, target);

        self.add_preferred(&mut draft, rule, ingredients);
        self.backfill_required(&mut draft, rule, rng);
        if meal.is_snack() && draft.items.is_empty() {
            self.add_snack_fallback(&mut draft);
        }

        draft.finish(self.catalog, rule)
    }

    /// Pass 1: user ingredients.
    fn add_preferred<S: AsRef<str>>(&self, draft: &mut MealDraft, rule: &MealRule, ingredients: &[S]) {
        let meal = draft.meal;
        let mut satisfied: BTreeSet<Category> = BTreeSet::new();

        for id in ingredients {
            let id = id.as_ref();
            let Some(food) = self.catalog.get(id) else {
                debug!(%meal, id, "skipping unknown ingredient");
                continue;
            };
            if !food.allowed_in(meal) {
                debug!(%meal, id, "ingredient not allowed in this meal");
                continue;
            }
            if satisfied.contains(&food.category) {
                debug!(%meal, id, category = %food.category, "category already chosen");
                continue;
            }

            let calories = food.standard_calories();
            match rule.ceiling_for(food.category) {
                Some(ceiling) if calories <= ceiling => {}
                Some(ceiling) => {
                    debug!(%meal, id, calories, ceiling, "over category ceiling");
                    continue;
                }
                None => {
                    debug!(%meal, id, category = %food.category, "no ceiling for category");
                    continue;
                }
            }

            if draft.try_add(food, ItemSource::Preferred) {
                satisfied.insert(food.category);
            }
        }
    }

    /// Pass 2: one random draw per missing required category.
    fn backfill_required<R: Rng>(&self, draft: &mut MealDraft, rule: &MealRule, rng: &mut R) {
        let meal = draft.meal;

        for &category in &rule.required_categories {
            if category_present(self.catalog, &draft.items, category) {
                continue;
            }
            let candidates = self.catalog.eligible(category, meal);
            if candidates.is_empty() {
                debug!(%meal, %category, "no eligible food to backfill");
                continue;
            }
            let food = candidates[rng.random_range(0..candidates.len())];
            draft.try_add(food, ItemSource::Backfill);
        }
    }

    /// Pass 3: keep snacks from coming back empty.
    fn add_snack_fallback(&self, draft: &mut MealDraft) {
        for id in [SNACK_FALLBACK_FRUIT, SNACK_FALLBACK_CARB] {
            match self.catalog.get(id) {
                Some(food) => {
                    draft.try_add(food, ItemSource::SnackFallback);
                }
                None => debug!(meal = %draft.meal, id, "snack fallback not in catalog"),
            }
        }
    }
}

/// Mutable state of a single composition.
struct MealDraft {
    meal: MealType,
    target: f64,
    items: Vec<SelectedItem>,
    total: f64,
}

impl MealDraft {
    fn new(meal: MealType, target: f64) -> Self {
        Self {
            meal,
            target,
            items: Vec::new(),
            total: 0.0,
        }
    }

    /// Budgeted add. Returns whether the food was placed.
    fn try_add(&mut self, food: &FoodRule, source: ItemSource) -> bool {
        let calories = food.standard_calories();
        if self.total + calories > self.target {
            debug!(
                meal = %self.meal,
                id = %food.id,
                calories,
                total = self.total,
                target = self.target,
                "over meal budget"
            );
            return false;
        }
        self.items.push(SelectedItem::from_rule(food, source));
        self.total += calories;
        debug!(meal = %self.meal, id = %food.id, ?source, total = self.total, "added");
        true
    }

    fn finish(self, catalog: &Catalog, rule: &MealRule) -> MealResult {
        let missing_categories: Vec<Category> = rule
            .required_categories
            .iter()
            .copied()
            .filter(|&category| !category_present(catalog, &self.items, category))
            .collect();

        MealResult {
            calories: round_calories(self.total),
            target_calories: self.target,
            complete: missing_categories.is_empty(),
            missing_categories,
            items: self.items,
            exact_calories: self.total,
        }
    }
}
