use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDate, TimeZone};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::{self, MealSuggestion};
use crate::db::Database;
use crate::models::{
    DietProfile, ExcludedMeal, ExportData, ImportSummary, MS_PER_HOUR, Meal, NewMeal, Streak,
    UpdateMeal, clean_list, validate_meal_name,
};
use crate::nutrition::{self, Nutrient, NutrientStatus};

const PROFILE_KEY: &str = "diet_profile";

/// Facade over the store: meal CRUD, exclusion-aware picking, the cooking
/// streak, and the nutrition companion. Time-sensitive operations take the
/// current wall clock in epoch milliseconds from the caller.
pub struct PotluckService {
    db: Database,
}

impl PotluckService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    // --- Meals ---

    pub fn add_meal(&self, meal: &NewMeal, now_ms: i64) -> Result<Meal> {
        let cleaned = NewMeal {
            name: validate_meal_name(&meal.name)?,
            recipe: meal.recipe.trim().to_string(),
            ingredients: clean_list(&meal.ingredients),
            steps: clean_list(&meal.steps),
            tags: clean_list(&meal.tags),
            image: meal.image.clone(),
        };
        self.db.insert_meal(&cleaned, now_ms)
    }

    pub fn get_meal(&self, id: &str) -> Result<Meal> {
        self.db.get_meal(id)
    }

    pub fn list_meals(&self, tag: Option<&str>) -> Result<Vec<Meal>> {
        match tag {
            Some(tag) => self.db.get_meals_by_tag(tag),
            None => self.db.get_all_meals(),
        }
    }

    pub fn update_meal(&self, id: &str, update: &UpdateMeal) -> Result<Meal> {
        let update = UpdateMeal {
            name: update.name.as_deref().map(validate_meal_name).transpose()?,
            recipe: update.recipe.as_ref().map(|r| r.trim().to_string()),
            ingredients: update.ingredients.as_deref().map(clean_list),
            steps: update.steps.as_deref().map(clean_list),
            tags: update.tags.as_deref().map(clean_list),
            image: update.image.clone(),
        };
        self.db.update_meal(id, &update)
    }

    pub fn delete_meal(&self, id: &str) -> Result<bool> {
        self.db.delete_meal(id)
    }

    // --- Picking ---

    /// Meals eligible for a pick: optionally one tag, minus every meal with
    /// a non-expired exclusion.
    pub fn available_meals(&self, tag: Option<&str>, now_ms: i64) -> Result<Vec<Meal>> {
        let meals = self.list_meals(tag)?;
        let excluded: HashSet<String> = self
            .db
            .get_excluded_meals(now_ms)?
            .into_iter()
            .map(|e| e.meal_id)
            .collect();
        Ok(meals
            .into_iter()
            .filter(|m| !excluded.contains(&m.id))
            .collect())
    }

    /// Uniform random pick from the available pool. An empty pool is a
    /// normal outcome, not an error.
    pub fn pick_meal<R: Rng + ?Sized>(
        &self,
        tag: Option<&str>,
        now_ms: i64,
        rng: &mut R,
    ) -> Result<Option<Meal>> {
        let candidates = self.available_meals(tag, now_ms)?;
        Ok(candidates.choose(rng).cloned())
    }

    // --- Exclusions ---

    pub fn exclude_meal(&self, meal_id: &str, hours: i64, now_ms: i64) -> Result<ExcludedMeal> {
        let meal = self.db.get_meal(meal_id)?;
        let excluded_until = now_ms + hours * MS_PER_HOUR;
        self.db.exclude_meal(meal_id, excluded_until)?;
        Ok(ExcludedMeal {
            meal_id: meal.id,
            excluded_until,
            meal_name: Some(meal.name),
        })
    }

    pub fn excluded_meals(&self, now_ms: i64) -> Result<Vec<ExcludedMeal>> {
        self.db.get_excluded_meals(now_ms)
    }

    pub fn is_meal_excluded(&self, meal_id: &str, now_ms: i64) -> Result<bool> {
        self.db.is_meal_excluded(meal_id, now_ms)
    }

    /// Put a meal back in the pool before its window elapses.
    pub fn restore_meal(&self, meal_id: &str) -> Result<bool> {
        self.db.remove_exclusion(meal_id)
    }

    pub fn purge_expired_exclusions(&self, now_ms: i64) -> Result<usize> {
        self.db.purge_expired_exclusions(now_ms)
    }

    // --- Streak ---

    pub fn streak(&self) -> Result<Streak> {
        self.db.get_streak()
    }

    /// Record a cooked meal and move the streak:
    /// same local day as the last cook leaves the count alone, the day after
    /// increments it, anything else starts over at 1.
    pub fn mark_cooked(&self, meal_id: &str, now_ms: i64) -> Result<Streak> {
        self.db.get_meal(meal_id)?;

        let mut streak = self.db.get_streak()?;
        let today = local_day(now_ms);
        let last = local_day(streak.last_cooked_at);

        streak.current_count = if streak.last_cooked_at > 0 && last == today {
            streak.current_count
        } else if streak.last_cooked_at > 0 && last.succ_opt() == Some(today) {
            streak.current_count + 1
        } else {
            1
        };
        streak.last_cooked_at = now_ms;
        self.db.put_streak(&streak)?;
        Ok(streak)
    }

    // --- Diet profile ---

    pub fn profile(&self) -> Result<DietProfile> {
        match self.db.get_setting(PROFILE_KEY)? {
            Some(json) => {
                let profile = serde_json::from_str(&json)
                    .map_err(|e| anyhow::anyhow!("Stored diet profile is corrupt: {e}"))?;
                Ok(profile)
            }
            None => Ok(DietProfile::default()),
        }
    }

    pub fn set_profile(&self, profile: &DietProfile) -> Result<()> {
        self.db
            .set_setting(PROFILE_KEY, &serde_json::to_string(profile)?)
    }

    // --- Nutrition ---

    /// Add to today's running total; `date` is a local `YYYY-MM-DD` day.
    pub fn log_intake(&self, date: &str, nutrient: Nutrient, amount: f64) -> Result<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            anyhow::bail!("Intake amount must be a positive number");
        }
        self.db.add_intake(date, nutrient, amount)
    }

    pub fn intake_for(&self, date: &str) -> Result<Vec<(Nutrient, f64)>> {
        self.db.get_intake_for_date(date)
    }

    /// The nutrition status card for one day under the stored profile.
    pub fn nutrition_status(&self, date: &str) -> Result<Vec<NutrientStatus>> {
        let profile = self.profile()?;
        let intake = self.intake_for(date)?;
        Ok(nutrition::build_status(&profile, &intake))
    }

    pub fn suggestions(
        &self,
        max_prep_seconds: Option<u32>,
        limit: Option<usize>,
    ) -> Vec<&'static MealSuggestion> {
        catalog::suggestions(max_prep_seconds, limit)
    }

    // --- Export / Import ---

    pub fn export_all(&self) -> Result<ExportData> {
        let profile_json = self.db.get_setting(PROFILE_KEY)?;
        self.db
            .export_all(profile_json.as_deref(), &Local::now().to_rfc3339())
    }

    pub fn import_all(&self, data: &ExportData, dry_run: bool) -> Result<ImportSummary> {
        self.db.import_all(data, dry_run)
    }
}

/// Local calendar day of an epoch-millisecond timestamp.
fn local_day(ms: i64) -> NaiveDate {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}
