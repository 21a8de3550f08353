use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use potluck_core::service::PotluckService;

use super::helpers::{format_local, format_remaining, json_error, now_ms, truncate};

pub(crate) fn cmd_exclude(
    svc: &PotluckService,
    meal_ref: &str,
    hours: i64,
    json: bool,
) -> Result<()> {
    if hours <= 0 {
        anyhow::bail!("Exclusion window must be at least one hour");
    }

    let Ok(meal) = super::resolve_meal(svc, meal_ref) else {
        if json {
            println!("{}", json_error(&format!("Meal '{meal_ref}' not found")));
        } else {
            eprintln!("Meal '{meal_ref}' not found");
        }
        process::exit(2);
    };

    let exclusion = svc.exclude_meal(&meal.id, hours, now_ms())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exclusion)?);
    } else {
        let name = &meal.name;
        let until = format_local(exclusion.excluded_until);
        println!("Excluded {name} for {hours}h (back {until})");
    }
    Ok(())
}

pub(crate) fn cmd_exclusions(svc: &PotluckService, purge: bool, json: bool) -> Result<()> {
    let now = now_ms();

    if purge {
        let purged = svc.purge_expired_exclusions(now)?;
        if !json && purged > 0 {
            eprintln!("Purged {purged} expired exclusion(s)");
        }
    }

    let excluded = svc.excluded_meals(now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&excluded)?);
        return Ok(());
    }

    if excluded.is_empty() {
        eprintln!("No meals are currently excluded");
        process::exit(2);
    }

    #[derive(Tabled)]
    struct ExclusionRow {
        #[tabled(rename = "Meal")]
        meal: String,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Back")]
        back: String,
        #[tabled(rename = "Remaining")]
        remaining: String,
    }

    let rows: Vec<ExclusionRow> = excluded
        .iter()
        .map(|e| ExclusionRow {
            meal: truncate(e.meal_name.as_deref().unwrap_or("?"), 35),
            id: e.meal_id.split('-').next().unwrap_or(&e.meal_id).to_string(),
            back: format_local(e.excluded_until),
            remaining: format_remaining(e.excluded_until, now),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_restore(svc: &PotluckService, meal_ref: &str, json: bool) -> Result<()> {
    let Ok(meal) = super::resolve_meal(svc, meal_ref) else {
        if json {
            println!("{}", json_error(&format!("Meal '{meal_ref}' not found")));
        } else {
            eprintln!("Meal '{meal_ref}' not found");
        }
        process::exit(2);
    };

    if svc.restore_meal(&meal.id)? {
        if json {
            println!("{}", serde_json::json!({ "restored": meal.id }));
        } else {
            let name = &meal.name;
            println!("{name} is back in the pool");
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("{} was not excluded", meal.name)));
        } else {
            let name = &meal.name;
            eprintln!("{name} was not excluded");
        }
        process::exit(2);
    }
}
