use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use potluck_core::models::{Meal, NewMeal, UpdateMeal};
use potluck_core::service::PotluckService;

use super::helpers::{format_local, json_error, now_ms, truncate};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_meal_add(
    svc: &PotluckService,
    name: &str,
    recipe: &str,
    ingredients: Vec<String>,
    steps: Vec<String>,
    tags: Vec<String>,
    image: Option<String>,
    json: bool,
) -> Result<()> {
    let meal = svc.add_meal(
        &NewMeal {
            name: name.to_string(),
            recipe: recipe.to_string(),
            ingredients,
            steps,
            tags,
            image,
        },
        now_ms(),
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
    } else {
        let name = &meal.name;
        let id = &meal.id;
        let tags = if meal.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", meal.tags.join(", "))
        };
        println!("Added {name}{tags} ({id})");
    }
    Ok(())
}

pub(crate) fn cmd_meal_list(svc: &PotluckService, tag: Option<&str>, json: bool) -> Result<()> {
    let meals = svc.list_meals(tag)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
        return Ok(());
    }

    if meals.is_empty() {
        match tag {
            Some(tag) => eprintln!("No meals tagged '{tag}' yet. Add some to get started!"),
            None => eprintln!("No meals yet. Add some to get started!"),
        }
        process::exit(2);
    }

    print_meal_table(&meals);
    Ok(())
}

pub(crate) fn cmd_meal_show(svc: &PotluckService, meal_ref: &str, json: bool) -> Result<()> {
    let Ok(meal) = super::resolve_meal(svc, meal_ref) else {
        if json {
            println!("{}", json_error(&format!("Meal '{meal_ref}' not found")));
        } else {
            eprintln!("Meal '{meal_ref}' not found");
        }
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
        return Ok(());
    }

    let name = &meal.name;
    let id = &meal.id;
    println!("=== {name} ===");
    println!("  id: {id}");
    if !meal.tags.is_empty() {
        let tags = meal.tags.join(", ");
        println!("  tags: {tags}");
    }
    if let Some(ref image) = meal.image {
        println!("  image: {image}");
    }
    let added = format_local(meal.created_at);
    println!("  added: {added}");
    if !meal.recipe.is_empty() {
        let recipe = &meal.recipe;
        println!("\n  {recipe}");
    }
    if !meal.ingredients.is_empty() {
        println!("\n  INGREDIENTS");
        for ingredient in &meal.ingredients {
            println!("    - {ingredient}");
        }
    }
    if !meal.steps.is_empty() {
        println!("\n  STEPS");
        for (i, step) in meal.steps.iter().enumerate() {
            let n = i + 1;
            println!("    {n}. {step}");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_meal_update(
    svc: &PotluckService,
    meal_ref: &str,
    name: Option<String>,
    recipe: Option<String>,
    ingredients: Option<Vec<String>>,
    steps: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    image: Option<String>,
    clear_image: bool,
    json: bool,
) -> Result<()> {
    if name.is_none()
        && recipe.is_none()
        && ingredients.is_none()
        && steps.is_none()
        && tags.is_none()
        && image.is_none()
        && !clear_image
    {
        anyhow::bail!(
            "Nothing to update. Provide at least one of --name, --recipe, --ingredient, --step, --tag, --image, or --clear-image"
        );
    }

    let Ok(existing) = super::resolve_meal(svc, meal_ref) else {
        if json {
            println!("{}", json_error(&format!("Meal '{meal_ref}' not found")));
        } else {
            eprintln!("Meal '{meal_ref}' not found");
        }
        process::exit(2);
    };

    let image = if clear_image {
        Some(None)
    } else {
        image.map(Some)
    };

    let update = UpdateMeal {
        name,
        recipe,
        ingredients,
        steps,
        tags,
        image,
    };

    let meal = svc.update_meal(&existing.id, &update)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
    } else {
        let name = &meal.name;
        let id = &meal.id;
        println!("Updated {name} ({id})");
    }
    Ok(())
}

pub(crate) fn cmd_meal_delete(svc: &PotluckService, meal_ref: &str, json: bool) -> Result<()> {
    let Ok(meal) = super::resolve_meal(svc, meal_ref) else {
        if json {
            println!("{}", json_error(&format!("Meal '{meal_ref}' not found")));
        } else {
            eprintln!("Meal '{meal_ref}' not found");
        }
        process::exit(2);
    };

    svc.delete_meal(&meal.id)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": meal.id }));
    } else {
        let name = &meal.name;
        println!("Deleted {name}");
    }
    Ok(())
}

pub(crate) fn print_meal_table(meals: &[Meal]) {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Tags")]
        tags: String,
        #[tabled(rename = "Ingredients")]
        ingredients: usize,
        #[tabled(rename = "Added")]
        added: String,
    }

    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| MealRow {
            id: short_id(&m.id),
            name: truncate(&m.name, 35),
            tags: truncate(&m.tags.join(", "), 25),
            ingredients: m.ingredients.len(),
            added: format_local(m.created_at),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// First UUID segment: enough to disambiguate in a listing.
fn short_id(id: &str) -> String {
    id.split('-').next().unwrap_or(id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(
            short_id("550e8400-e29b-41d4-a716-446655440000"),
            "550e8400"
        );
        assert_eq!(short_id("plain"), "plain");
    }
}
