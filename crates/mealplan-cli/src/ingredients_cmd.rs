//! `mealplan ingredients` command: list what can be picked for each meal.

use std::fmt::Write as _;

use anyhow::{Context, Result};

use mealplan_core::ingredients::ingredients_for_meal;
use mealplan_core::{Catalog, MealIngredients, MealType, list_ingredients};

/// Run the ingredients command. `meal` restricts the listing to one slot.
pub fn run_ingredients(catalog: &Catalog, meal: Option<&str>, json: bool) -> Result<()> {
    let listing = match meal {
        Some(name) => {
            let meal: MealType = name
                .parse()
                .with_context(|| format!("expected one of: {}", meal_names()))?;
            vec![ingredients_for_meal(catalog, meal)]
        }
        None => list_ingredients(catalog),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", render_ingredients_text(&listing, catalog));
    }
    Ok(())
}

fn meal_names() -> String {
    MealType::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the listing with display names next to catalog ids.
pub fn render_ingredients_text(listing: &[MealIngredients], catalog: &Catalog) -> String {
    let mut out = String::new();
    for (i, meal) in listing.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{} ({})", meal.label, meal.meal);
        for group in &meal.categories {
            let _ = writeln!(out, "  {:?}", group.name);
            for id in &group.ingredients {
                let name = catalog.get(id).map_or(id.as_str(), |rule| rule.name.as_str());
                let _ = writeln!(out, "    {id:<22} {name}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_shows_groups_and_names() {
        let catalog = Catalog::builtin();
        let text = render_ingredients_text(&list_ingredients(catalog), catalog);

        assert!(text.starts_with("Breakfast (breakfast)\n  Beverages\n"));
        assert!(text.contains("    coffee                 Coffee\n"));
        assert!(text.contains("Afternoon snack (afternoon_snack)"));
        assert!(!text.contains("Snacks"));
    }

    #[test]
    fn single_meal_listing() {
        let catalog = Catalog::builtin();
        let listing = vec![ingredients_for_meal(catalog, MealType::MorningSnack)];
        let text = render_ingredients_text(&listing, catalog);

        assert!(text.starts_with("Morning snack (morning_snack)\n"));
        assert!(text.contains("wholegrain_crackers"));
        assert!(!text.contains("Breakfast"));
    }

    #[test]
    fn unknown_meal_is_an_error() {
        let err = run_ingredients(Catalog::builtin(), Some("brunch"), true).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("afternoon_snack"), "unexpected error: {msg}");
        assert!(msg.contains("brunch"), "unexpected error: {msg}");
    }
}
