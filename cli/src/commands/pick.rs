use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::process;

use potluck_core::models::Meal;
use potluck_core::motion::{parse_motion_csv, replay_samples};
use potluck_core::service::PotluckService;

use super::helpers::{format_local, json_error, now_ms};

fn picker_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

pub(crate) fn cmd_pick(
    svc: &PotluckService,
    tag: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let now = now_ms();
    let mut rng = picker_rng(seed);
    let available = svc.available_meals(tag, now)?;
    let picked = {
        use rand::seq::IndexedRandom;
        available.choose(&mut rng).cloned()
    };

    let Some(meal) = picked else {
        if json {
            println!("{}", json_error("No meals available to pick"));
        } else {
            match tag {
                Some(tag) => eprintln!("No meals tagged '{tag}' available. Add some to get started!"),
                None => eprintln!("No meals available. Add some to get started!"),
            }
        }
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
        return Ok(());
    }

    print_picked(&meal, available.len(), tag);
    Ok(())
}

fn print_picked(meal: &Meal, pool_size: usize, tag: Option<&str>) {
    let name = &meal.name;
    println!("Your meal is ready: {name}");
    if !meal.tags.is_empty() {
        let tags = meal.tags.join(", ");
        println!("  tags: {tags}");
    }
    let id = &meal.id;
    println!("  id: {id}");
    let pool = match tag {
        Some(tag) => format!("{pool_size} meal(s) available in '{tag}'"),
        None => format!("{pool_size} meal(s) available"),
    };
    println!("  ({pool})");
    println!("\nCooked it? `potluck cooked {id}` — never again? `potluck exclude {id}`");
}

pub(crate) fn cmd_cooked(svc: &PotluckService, meal_ref: &str, json: bool) -> Result<()> {
    let Ok(meal) = super::resolve_meal(svc, meal_ref) else {
        if json {
            println!("{}", json_error(&format!("Meal '{meal_ref}' not found")));
        } else {
            eprintln!("Meal '{meal_ref}' not found");
        }
        process::exit(2);
    };

    let streak = svc.mark_cooked(&meal.id, now_ms())?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "meal_id": meal.id, "streak": streak })
        );
    } else {
        let name = &meal.name;
        let count = streak.current_count;
        println!("Well done! {name} cooked.");
        println!("🔥 {count} day streak");
    }
    Ok(())
}

pub(crate) fn cmd_shake_replay(
    svc: &PotluckService,
    file: &Path,
    pick: bool,
    tag: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read recording: {}", file.display()))?;
    let samples = parse_motion_csv(data.as_bytes())?;
    let summary = replay_samples(&samples);

    let picked = if pick && !summary.triggers.is_empty() {
        let mut rng = picker_rng(seed);
        svc.pick_meal(tag, now_ms(), &mut rng)?
    } else {
        None
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "summary": summary,
                "picked": picked,
            }))?
        );
        return Ok(());
    }

    let count = summary.samples_parsed;
    #[allow(clippy::cast_precision_loss)]
    let seconds = summary.duration_ms as f64 / 1000.0;
    let triggers = summary.triggers.len();
    println!("Replayed {count} samples over {seconds:.1}s: {triggers} shake trigger(s)");
    for t in &summary.triggers {
        println!("  shake at {t}ms");
    }

    if pick {
        if let Some(meal) = picked {
            println!();
            print_picked(&meal, svc.available_meals(tag, now_ms())?.len(), tag);
        } else if summary.triggers.is_empty() {
            eprintln!("No shake detected, nothing picked");
            process::exit(2);
        } else {
            eprintln!("Shake detected but no meals available. Add some to get started!");
            process::exit(2);
        }
    }
    Ok(())
}

pub(crate) fn cmd_streak(svc: &PotluckService, json: bool) -> Result<()> {
    let streak = svc.streak()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&streak)?);
        return Ok(());
    }

    if streak.current_count == 0 {
        println!("No streak yet. Cook something!");
    } else {
        let count = streak.current_count;
        let last = format_local(streak.last_cooked_at);
        println!("🔥 {count} day streak (last cooked {last})");
    }
    Ok(())
}
