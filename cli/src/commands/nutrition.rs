use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use potluck_core::nutrition::{NutrientLevel, parse_nutrient};
use potluck_core::service::PotluckService;

use super::helpers::{format_prep, parse_day};

pub(crate) fn cmd_intake_log(
    svc: &PotluckService,
    nutrient: &str,
    amount: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let nutrient = parse_nutrient(nutrient)?;
    let date = parse_day(date)?;
    let total = svc.log_intake(&date, nutrient, amount)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "date": date,
                "nutrient": nutrient,
                "logged": amount,
                "total": total,
            })
        );
    } else {
        let name = nutrient.display_name();
        let unit = nutrient.unit();
        println!("Logged {amount}{unit} {name} for {date} (day total {total}{unit})");
    }
    Ok(())
}

pub(crate) fn cmd_intake_show(svc: &PotluckService, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_day(date)?;
    let intake = svc.intake_for(&date)?;

    if json {
        let rows: Vec<serde_json::Value> = intake
            .iter()
            .map(|(n, a)| serde_json::json!({ "nutrient": n, "amount": a, "unit": n.unit() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if intake.is_empty() {
        eprintln!("No intake logged for {date}");
        process::exit(2);
    }

    println!("=== {date} ===");
    for (nutrient, amount) in &intake {
        let name = nutrient.display_name();
        let unit = nutrient.unit();
        println!("  {name}: {amount}{unit}");
    }
    Ok(())
}

pub(crate) fn cmd_status(svc: &PotluckService, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_day(date)?;
    let statuses = svc.nutrition_status(&date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct StatusRow {
        #[tabled(rename = "Nutrient")]
        nutrient: String,
        #[tabled(rename = "Intake")]
        intake: String,
        #[tabled(rename = "Minimum")]
        minimum: String,
        #[tabled(rename = "%")]
        percent: String,
        #[tabled(rename = "Level")]
        level: String,
    }

    let rows: Vec<StatusRow> = statuses
        .iter()
        .map(|s| StatusRow {
            nutrient: s.nutrient.display_name().to_string(),
            intake: format!("{:.0}{}", s.amount, s.unit),
            minimum: format!("{:.0}{}", s.minimum, s.unit),
            percent: format!("{:.0}%", s.percent),
            level: s.level.as_str().to_string(),
        })
        .collect();

    println!("=== {date} ===");
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    for status in &statuses {
        if status.level != NutrientLevel::Normal {
            let message = &status.alert.message;
            println!("  ! {message}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_suggest(
    svc: &PotluckService,
    max_prep_minutes: Option<u32>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let max_prep_seconds = max_prep_minutes.map(|m| m * 60);
    let suggestions = svc.suggestions(max_prep_seconds, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        let minutes = max_prep_minutes.unwrap_or(0);
        eprintln!("No suggestions ready within {minutes} minutes");
        process::exit(2);
    }

    #[derive(Tabled)]
    struct SuggestionRow {
        #[tabled(rename = "Meal")]
        meal: &'static str,
        #[tabled(rename = "Prep")]
        prep: String,
        #[tabled(rename = "Coverage")]
        coverage: String,
    }

    let rows: Vec<SuggestionRow> = suggestions
        .iter()
        .map(|s| SuggestionRow {
            meal: s.name,
            prep: format_prep(s.prep_time_seconds),
            coverage: format!("{}%", s.satisfaction_percent),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}
