mod exclude;
mod helpers;
mod meal;
mod nutrition;
mod pick;
mod profile;
mod transfer;

use anyhow::{Result, bail};

use potluck_core::models::Meal;
use potluck_core::service::PotluckService;

pub(crate) use exclude::{cmd_exclude, cmd_exclusions, cmd_restore};
pub(crate) use meal::{cmd_meal_add, cmd_meal_delete, cmd_meal_list, cmd_meal_show, cmd_meal_update};
pub(crate) use nutrition::{cmd_intake_log, cmd_intake_show, cmd_status, cmd_suggest};
pub(crate) use pick::{cmd_cooked, cmd_pick, cmd_shake_replay, cmd_streak};
pub(crate) use profile::{cmd_profile_options, cmd_profile_set, cmd_profile_show};
pub(crate) use transfer::{cmd_export, cmd_import};

/// Resolve a user-supplied meal reference: exact id, then a unique id
/// prefix, then a unique case-insensitive name.
pub(super) fn resolve_meal(svc: &PotluckService, meal_ref: &str) -> Result<Meal> {
    if let Ok(meal) = svc.get_meal(meal_ref) {
        return Ok(meal);
    }

    let all = svc.list_meals(None)?;

    let by_prefix: Vec<&Meal> = all.iter().filter(|m| m.id.starts_with(meal_ref)).collect();
    match by_prefix.len() {
        1 => return Ok(by_prefix[0].clone()),
        n if n > 1 => bail!("Meal reference '{meal_ref}' is ambiguous ({n} id matches)"),
        _ => {}
    }

    let by_name: Vec<&Meal> = all
        .iter()
        .filter(|m| m.name.eq_ignore_ascii_case(meal_ref))
        .collect();
    match by_name.len() {
        1 => Ok(by_name[0].clone()),
        0 => bail!("No meal matching '{meal_ref}'"),
        n => bail!("Meal name '{meal_ref}' is ambiguous ({n} matches); use the id"),
    }
}
