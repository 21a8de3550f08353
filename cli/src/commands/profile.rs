use anyhow::Result;

use potluck_core::models::{
    ActivityLevel, DietGoal, DietRestriction, parse_activity, parse_goal, parse_restriction,
};
use potluck_core::service::PotluckService;

pub(crate) fn cmd_profile_set(
    svc: &PotluckService,
    restriction: Option<&str>,
    goal: Option<&str>,
    activity: Option<&str>,
    height: Option<f64>,
    weight: Option<f64>,
    json: bool,
) -> Result<()> {
    if restriction.is_none()
        && goal.is_none()
        && activity.is_none()
        && height.is_none()
        && weight.is_none()
    {
        anyhow::bail!(
            "Nothing to set. Provide at least one of --restriction, --goal, --activity, --height, or --weight"
        );
    }

    let mut profile = svc.profile()?;
    if let Some(r) = restriction {
        profile.restriction = parse_restriction(r)?;
    }
    if let Some(g) = goal {
        profile.goal = parse_goal(g)?;
    }
    if let Some(a) = activity {
        profile.activity = parse_activity(a)?;
    }
    if let Some(h) = height {
        if h <= 0.0 {
            anyhow::bail!("Height must be positive");
        }
        profile.height_cm = Some(h);
    }
    if let Some(w) = weight {
        if w <= 0.0 {
            anyhow::bail!("Weight must be positive");
        }
        profile.weight_kg = Some(w);
    }

    svc.set_profile(&profile)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Profile updated");
        print_profile(&profile);
    }
    Ok(())
}

pub(crate) fn cmd_profile_show(svc: &PotluckService, json: bool) -> Result<()> {
    let profile = svc.profile()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }
    Ok(())
}

fn print_profile(profile: &potluck_core::models::DietProfile) {
    let restriction = profile.restriction.label();
    let description = profile.restriction.description();
    let goal = profile.goal.label();
    let activity = profile.activity.as_str();
    println!("  restriction: {restriction} ({description})");
    println!("  goal: {goal}");
    println!("  activity: {activity}");
    match profile.height_cm {
        Some(h) => println!("  height: {h:.0} cm"),
        None => println!("  height: not set"),
    }
    match profile.weight_kg {
        Some(w) => println!("  weight: {w:.1} kg"),
        None => println!("  weight: not set"),
    }
}

pub(crate) fn cmd_profile_options(json: bool) -> Result<()> {
    if json {
        let doc = serde_json::json!({
            "restrictions": DietRestriction::ALL
                .iter()
                .map(|r| serde_json::json!({
                    "value": r.as_str(),
                    "label": r.label(),
                    "description": r.description(),
                }))
                .collect::<Vec<_>>(),
            "goals": DietGoal::ALL
                .iter()
                .map(|g| serde_json::json!({ "value": g.as_str(), "label": g.label() }))
                .collect::<Vec<_>>(),
            "activity_levels": ActivityLevel::ALL
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("RESTRICTIONS");
    for r in DietRestriction::ALL {
        let value = r.as_str();
        let description = r.description();
        println!("  {value:<14} {description}");
    }
    println!("\nGOALS");
    for g in DietGoal::ALL {
        let value = g.as_str();
        let label = g.label();
        println!("  {value:<16} {label}");
    }
    println!("\nACTIVITY LEVELS");
    for a in ActivityLevel::ALL {
        let value = a.as_str();
        println!("  {value}");
    }
    Ok(())
}
