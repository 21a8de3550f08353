use anyhow::{Context, Result};
use std::path::Path;

use potluck_core::models::ExportData;
use potluck_core::service::PotluckService;

pub(crate) fn cmd_export(svc: &PotluckService, output: Option<&Path>) -> Result<()> {
    let data = svc.export_all()?;
    let json = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            let meals = data.meals.len();
            eprintln!("Exported {meals} meal(s) to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub(crate) fn cmd_import(svc: &PotluckService, file: &Path, dry_run: bool, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let data: ExportData =
        serde_json::from_str(&raw).context("Import file is not a valid potluck export")?;

    let summary = svc.import_all(&data, dry_run)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if dry_run {
        println!("Dry run — nothing was written.\n");
    }
    let imported = summary.meals_imported;
    let skipped = summary.meals_skipped;
    let exclusions = summary.exclusions_imported;
    let intake = summary.intake_rows_imported;
    println!("Meals: {imported} imported, {skipped} already present");
    println!("Exclusions: {exclusions}");
    println!("Intake rows: {intake}");
    if summary.streak_updated {
        println!("Streak: updated");
    }
    if summary.profile_updated {
        println!("Profile: updated");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use potluck_core::models::NewMeal;

    #[test]
    fn test_export_then_import_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let source = PotluckService::new_in_memory().unwrap();
        source
            .add_meal(
                &NewMeal {
                    name: "Ramen".to_string(),
                    recipe: String::new(),
                    ingredients: vec!["noodles".to_string()],
                    steps: vec![],
                    tags: vec!["soup".to_string()],
                    image: None,
                },
                1000,
            )
            .unwrap();

        cmd_export(&source, Some(&path)).unwrap();

        let target = PotluckService::new_in_memory().unwrap();
        cmd_import(&target, &path, false, true).unwrap();
        let meals = target.list_meals(None).unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name, "Ramen");
        assert_eq!(meals[0].tags, vec!["soup"]);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();

        let svc = PotluckService::new_in_memory().unwrap();
        assert!(cmd_import(&svc, &path, false, true).is_err());
    }
}
