//! `mealplan plan` command: compose a day plan and print it.

use std::fmt::Write as _;

use anyhow::{Result, bail};

use mealplan_core::compose::{category_calories, category_present};
use mealplan_core::{Catalog, Category, DayPlan, ItemSource, MealResult, Planner};

/// Run the plan command against `planner`.
pub fn run_plan(
    planner: &Planner<'_>,
    ingredients: &[String],
    calories: f64,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    if !calories.is_finite() {
        bail!("--calories must be a finite number, got {calories}");
    }

    let unknown: Vec<&str> = ingredients
        .iter()
        .map(String::as_str)
        .filter(|id| planner.composer().catalog().get(id).is_none())
        .collect();
    if !unknown.is_empty() {
        tracing::warn!("ignoring unknown ingredients: {}", unknown.join(", "));
    }

    let plan = match seed {
        Some(seed) => planner.plan_day_seeded(ingredients, calories, seed),
        None => planner.plan_day(ingredients, calories),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_plan_text(&plan, planner.composer().catalog()));
    }
    Ok(())
}

/// Render a plan as a plain-text table.
pub fn render_plan_text(plan: &DayPlan, catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Day plan: {} kcal of {} kcal target",
        plan.total_calories,
        plan.target_calories.round()
    );

    for (meal, result) in plan.meals() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} ({} / {} kcal)",
            meal.label(),
            result.calories,
            result.target_calories.round()
        );
        render_meal(&mut out, result, catalog);
    }

    if !plan.is_complete() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Some meals are missing required categories.");
    }
    out
}

fn render_meal(out: &mut String, meal: &MealResult, catalog: &Catalog) {
    if meal.is_empty() {
        let _ = writeln!(out, "  (nothing fits)");
    }

    for item in &meal.items {
        let marker = match item.source {
            ItemSource::Preferred => "",
            ItemSource::Backfill => " [added]",
            ItemSource::SnackFallback => " [fallback]",
        };
        let _ = writeln!(
            out,
            "  {:<34} {:>6} {:<6} {:>5} kcal{marker}",
            item.name, item.quantity, item.unit, item.calories
        );
    }

    let subtotals: Vec<String> = Category::ALL
        .into_iter()
        .filter(|&category| category_present(catalog, &meal.items, category))
        .map(|category| {
            let kcal = category_calories(catalog, &meal.items, category);
            format!("{category} {kcal}")
        })
        .collect();
    if !subtotals.is_empty() {
        let _ = writeln!(out, "  by category: {}", subtotals.join(", "));
    }

    if !meal.missing_categories.is_empty() {
        let missing: Vec<String> = meal
            .missing_categories
            .iter()
            .map(ToString::to_string)
            .collect();
        let _ = writeln!(out, "  missing: {}", missing.join(", "));
    }
}
