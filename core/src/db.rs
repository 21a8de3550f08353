use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::models::{ExcludedMeal, ExportData, ImportSummary, Meal, NewMeal, Streak, UpdateMeal};
use crate::nutrition::{Nutrient, parse_nutrient};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        // Cascade deletes keep meal_tags and excluded_meals consistent
        self.conn.pragma_update(None, "foreign_keys", true)?;
        self.migrate()
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS meals (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    recipe TEXT NOT NULL DEFAULT '',
                    ingredients TEXT NOT NULL DEFAULT '[]',
                    steps TEXT NOT NULL DEFAULT '[]',
                    image TEXT,
                    created_at INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS meal_tags (
                    meal_id TEXT NOT NULL REFERENCES meals(id) ON DELETE CASCADE,
                    tag TEXT NOT NULL,
                    PRIMARY KEY (meal_id, tag)
                );

                CREATE TABLE IF NOT EXISTS streak (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    current_count INTEGER NOT NULL,
                    last_cooked_at INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS excluded_meals (
                    meal_id TEXT PRIMARY KEY REFERENCES meals(id) ON DELETE CASCADE,
                    excluded_until INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_meal_tags_tag ON meal_tags(tag);
                CREATE INDEX IF NOT EXISTS idx_meals_created_at ON meals(created_at);
                CREATE INDEX IF NOT EXISTS idx_excluded_until ON excluded_meals(excluded_until);

                PRAGMA user_version = 1;",
            )?;
        }

        if version < 2 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS user_settings (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 2;",
            )?;
        }

        if version < 3 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS intake (
                    date TEXT NOT NULL,
                    nutrient TEXT NOT NULL,
                    amount REAL NOT NULL,
                    PRIMARY KEY (date, nutrient)
                );

                PRAGMA user_version = 3;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    // Expects columns: 0: id, 1: name, 2: recipe, 3: ingredients (JSON),
    // 4: steps (JSON), 5: image, 6: created_at. Tags are joined separately.
    fn meal_from_row(row: &rusqlite::Row) -> rusqlite::Result<Meal> {
        let ingredients_json: String = row.get(3)?;
        let steps_json: String = row.get(4)?;
        Ok(Meal {
            id: row.get(0)?,
            name: row.get(1)?,
            recipe: row.get(2)?,
            ingredients: serde_json::from_str(&ingredients_json).unwrap_or_default(),
            steps: serde_json::from_str(&steps_json).unwrap_or_default(),
            tags: Vec::new(),
            image: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn load_tags(&self, meal_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM meal_tags WHERE meal_id = ?1 ORDER BY tag")?;
        let tags = stmt
            .query_map(params![meal_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn store_tags(&self, meal_id: &str, tags: &[String]) -> Result<()> {
        self.conn.execute(
            "DELETE FROM meal_tags WHERE meal_id = ?1",
            params![meal_id],
        )?;
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO meal_tags (meal_id, tag) VALUES (?1, ?2)")?;
        for tag in tags {
            stmt.execute(params![meal_id, tag])?;
        }
        Ok(())
    }

    fn with_tags(&self, mut meal: Meal) -> Result<Meal> {
        meal.tags = self.load_tags(&meal.id)?;
        Ok(meal)
    }

    // --- Meals ---

    pub fn insert_meal(&self, meal: &NewMeal, now_ms: i64) -> Result<Meal> {
        self.insert_meal_with_id(&Uuid::new_v4().to_string(), meal, now_ms)
    }

    pub fn insert_meal_with_id(&self, id: &str, meal: &NewMeal, created_at: i64) -> Result<Meal> {
        self.conn.execute(
            "INSERT INTO meals (id, name, recipe, ingredients, steps, image, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                meal.name,
                meal.recipe,
                serde_json::to_string(&meal.ingredients)?,
                serde_json::to_string(&meal.steps)?,
                meal.image,
                created_at,
            ],
        )?;
        self.store_tags(id, &meal.tags)?;
        self.get_meal(id)
    }

    pub fn get_meal(&self, id: &str) -> Result<Meal> {
        let meal = self
            .conn
            .query_row(
                "SELECT id, name, recipe, ingredients, steps, image, created_at
                 FROM meals WHERE id = ?1",
                params![id],
                Self::meal_from_row,
            )
            .context("Meal not found")?;
        self.with_tags(meal)
    }

    pub fn meal_exists(&self, id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM meals WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All meals, newest first (the created_at index order, reversed).
    pub fn get_all_meals(&self) -> Result<Vec<Meal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, recipe, ingredients, steps, image, created_at
             FROM meals ORDER BY created_at DESC, id",
        )?;
        let meals = stmt
            .query_map([], Self::meal_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        meals.into_iter().map(|m| self.with_tags(m)).collect()
    }

    /// Meals carrying the given tag (multi-entry index lookup).
    pub fn get_meals_by_tag(&self, tag: &str) -> Result<Vec<Meal>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.name, m.recipe, m.ingredients, m.steps, m.image, m.created_at
             FROM meals m
             JOIN meal_tags mt ON mt.meal_id = m.id
             WHERE mt.tag = ?1
             ORDER BY m.created_at DESC, m.id",
        )?;
        let meals = stmt
            .query_map(params![tag], Self::meal_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        meals.into_iter().map(|m| self.with_tags(m)).collect()
    }

    pub fn update_meal(&self, id: &str, update: &UpdateMeal) -> Result<Meal> {
        // Verify existence
        self.get_meal(id)?;

        if let Some(ref name) = update.name {
            self.conn.execute(
                "UPDATE meals SET name = ?1 WHERE id = ?2",
                params![name, id],
            )?;
        }
        if let Some(ref recipe) = update.recipe {
            self.conn.execute(
                "UPDATE meals SET recipe = ?1 WHERE id = ?2",
                params![recipe, id],
            )?;
        }
        if let Some(ref ingredients) = update.ingredients {
            self.conn.execute(
                "UPDATE meals SET ingredients = ?1 WHERE id = ?2",
                params![serde_json::to_string(ingredients)?, id],
            )?;
        }
        if let Some(ref steps) = update.steps {
            self.conn.execute(
                "UPDATE meals SET steps = ?1 WHERE id = ?2",
                params![serde_json::to_string(steps)?, id],
            )?;
        }
        if let Some(ref image) = update.image {
            self.conn.execute(
                "UPDATE meals SET image = ?1 WHERE id = ?2",
                params![image, id],
            )?;
        }
        if let Some(ref tags) = update.tags {
            self.store_tags(id, tags)?;
        }

        self.get_meal(id)
    }

    pub fn delete_meal(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM meals WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // --- Streak ---

    /// The singleton streak row; zero-valued when nothing was ever cooked.
    pub fn get_streak(&self) -> Result<Streak> {
        let streak = self
            .conn
            .query_row(
                "SELECT current_count, last_cooked_at FROM streak WHERE id = 1",
                [],
                |row| {
                    Ok(Streak {
                        current_count: row.get(0)?,
                        last_cooked_at: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(streak.unwrap_or_default())
    }

    pub fn put_streak(&self, streak: &Streak) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO streak (id, current_count, last_cooked_at) VALUES (1, ?1, ?2)",
            params![streak.current_count, streak.last_cooked_at],
        )?;
        Ok(())
    }

    // --- Exclusions ---

    pub fn exclude_meal(&self, meal_id: &str, excluded_until: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO excluded_meals (meal_id, excluded_until) VALUES (?1, ?2)",
            params![meal_id, excluded_until],
        )?;
        Ok(())
    }

    /// Non-expired exclusions as of `now_ms`. Rows whose window has elapsed
    /// are filtered, not returned.
    pub fn get_excluded_meals(&self, now_ms: i64) -> Result<Vec<ExcludedMeal>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.meal_id, e.excluded_until, m.name
             FROM excluded_meals e
             JOIN meals m ON m.id = e.meal_id
             WHERE e.excluded_until > ?1
             ORDER BY e.excluded_until",
        )?;
        let excluded = stmt
            .query_map(params![now_ms], |row| {
                Ok(ExcludedMeal {
                    meal_id: row.get(0)?,
                    excluded_until: row.get(1)?,
                    meal_name: Some(row.get(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(excluded)
    }

    pub fn is_meal_excluded(&self, meal_id: &str, now_ms: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM excluded_meals WHERE meal_id = ?1 AND excluded_until > ?2",
            params![meal_id, now_ms],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn remove_exclusion(&self, meal_id: &str) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM excluded_meals WHERE meal_id = ?1",
            params![meal_id],
        )?;
        Ok(rows > 0)
    }

    /// Drop rows whose window has already elapsed; returns how many went.
    pub fn purge_expired_exclusions(&self, now_ms: i64) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM excluded_meals WHERE excluded_until <= ?1",
            params![now_ms],
        )?;
        Ok(rows)
    }

    // --- Settings ---

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM user_settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO user_settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        )?;
        Ok(())
    }

    // --- Intake ---

    /// Add to a day's running total for one nutrient; returns the new total.
    pub fn add_intake(&self, date: &str, nutrient: Nutrient, amount: f64) -> Result<f64> {
        self.conn.execute(
            "INSERT INTO intake (date, nutrient, amount) VALUES (?1, ?2, ?3)
             ON CONFLICT(date, nutrient) DO UPDATE SET amount = amount + excluded.amount",
            params![date, nutrient.as_str(), amount],
        )?;
        let total: f64 = self.conn.query_row(
            "SELECT amount FROM intake WHERE date = ?1 AND nutrient = ?2",
            params![date, nutrient.as_str()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    pub fn set_intake(&self, date: &str, nutrient: Nutrient, amount: f64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO intake (date, nutrient, amount) VALUES (?1, ?2, ?3)",
            params![date, nutrient.as_str(), amount],
        )?;
        Ok(())
    }

    pub fn get_intake_for_date(&self, date: &str) -> Result<Vec<(Nutrient, f64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT nutrient, amount FROM intake WHERE date = ?1 ORDER BY nutrient")?;
        let rows = stmt
            .query_map(params![date], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        // Rows written by older builds may carry nutrients we no longer track
        Ok(rows
            .into_iter()
            .filter_map(|(name, amount)| parse_nutrient(&name).ok().map(|n| (n, amount)))
            .collect())
    }

    pub fn get_all_intake(&self) -> Result<Vec<(String, Nutrient, f64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, nutrient, amount FROM intake ORDER BY date, nutrient")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows
            .into_iter()
            .filter_map(|(date, name, amount)| {
                parse_nutrient(&name).ok().map(|n| (date, n, amount))
            })
            .collect())
    }

    // --- Export / Import ---

    pub fn export_all(&self, profile_json: Option<&str>, exported_at: &str) -> Result<ExportData> {
        let meals = self.get_all_meals()?;
        let streak = self.get_streak()?;
        // Export every exclusion row, expired or not; import filters nothing
        let mut stmt = self
            .conn
            .prepare("SELECT meal_id, excluded_until FROM excluded_meals ORDER BY meal_id")?;
        let exclusions = stmt
            .query_map([], |row| {
                Ok(ExcludedMeal {
                    meal_id: row.get(0)?,
                    excluded_until: row.get(1)?,
                    meal_name: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let profile = profile_json
            .map(serde_json::from_str)
            .transpose()
            .context("Stored diet profile is not valid JSON")?;

        let intake = self
            .get_all_intake()?
            .into_iter()
            .map(|(date, nutrient, amount)| crate::models::IntakeRow {
                date,
                nutrient,
                amount,
            })
            .collect();

        Ok(ExportData {
            meals,
            streak,
            exclusions,
            profile,
            intake,
            exported_at: exported_at.to_string(),
        })
    }

    /// Merge an export document into this store. Existing meal ids are kept
    /// as-is; the streak only moves forward; intake rows are replaced.
    pub fn import_all(&self, data: &ExportData, dry_run: bool) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for meal in &data.meals {
            if self.meal_exists(&meal.id)? {
                summary.meals_skipped += 1;
                continue;
            }
            if !dry_run {
                self.insert_meal_with_id(
                    &meal.id,
                    &NewMeal {
                        name: meal.name.clone(),
                        recipe: meal.recipe.clone(),
                        ingredients: meal.ingredients.clone(),
                        steps: meal.steps.clone(),
                        tags: meal.tags.clone(),
                        image: meal.image.clone(),
                    },
                    meal.created_at,
                )?;
            }
            summary.meals_imported += 1;
        }

        for exclusion in &data.exclusions {
            let present = if dry_run {
                self.meal_exists(&exclusion.meal_id)?
                    || data.meals.iter().any(|m| m.id == exclusion.meal_id)
            } else {
                self.meal_exists(&exclusion.meal_id)?
            };
            if !present {
                continue; // exclusion for a meal we never got
            }
            if !dry_run {
                self.exclude_meal(&exclusion.meal_id, exclusion.excluded_until)?;
            }
            summary.exclusions_imported += 1;
        }

        let existing = self.get_streak()?;
        if data.streak.last_cooked_at > existing.last_cooked_at {
            if !dry_run {
                self.put_streak(&data.streak)?;
            }
            summary.streak_updated = true;
        }

        for row in &data.intake {
            if !dry_run {
                self.set_intake(&row.date, row.nutrient, row.amount)?;
            }
            summary.intake_rows_imported += 1;
        }

        if let Some(ref profile) = data.profile {
            if !dry_run {
                self.set_setting("diet_profile", &serde_json::to_string(profile)?)?;
            }
            summary.profile_updated = true;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DietProfile;

    fn sample_meal() -> NewMeal {
        NewMeal {
            name: "Pasta Carbonara".to_string(),
            recipe: "Roman classic with eggs and guanciale".to_string(),
            ingredients: vec![
                "spaghetti".to_string(),
                "eggs".to_string(),
                "guanciale".to_string(),
                "pecorino".to_string(),
            ],
            steps: vec![
                "Boil the pasta".to_string(),
                "Crisp the guanciale".to_string(),
                "Toss off heat with egg and cheese".to_string(),
            ],
            tags: vec!["pasta".to_string(), "quick".to_string()],
            image: None,
        }
    }

    #[test]
    fn test_insert_and_get_meal() {
        let db = Database::open_in_memory().unwrap();
        let meal = db.insert_meal(&sample_meal(), 1_700_000_000_000).unwrap();

        let fetched = db.get_meal(&meal.id).unwrap();
        assert_eq!(fetched.id, meal.id);
        assert_eq!(fetched.name, "Pasta Carbonara");
        assert_eq!(fetched.recipe, "Roman classic with eggs and guanciale");
        assert_eq!(fetched.ingredients, meal.ingredients);
        assert_eq!(fetched.steps, meal.steps);
        assert_eq!(fetched.tags, vec!["pasta", "quick"]);
        assert_eq!(fetched.image, None);
        assert_eq!(fetched.created_at, 1_700_000_000_000);
    }

    #[test]
    fn test_get_meal_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_meal("nope").is_err());
    }

    #[test]
    fn test_get_all_meals_newest_first() {
        let db = Database::open_in_memory().unwrap();
        db.insert_meal(&sample_meal(), 1000).unwrap();
        let mut newer = sample_meal();
        newer.name = "Shakshuka".to_string();
        db.insert_meal(&newer, 2000).unwrap();

        let all = db.get_all_meals().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Shakshuka");
        assert_eq!(all[1].name, "Pasta Carbonara");
    }

    #[test]
    fn test_get_meals_by_tag() {
        let db = Database::open_in_memory().unwrap();
        db.insert_meal(&sample_meal(), 1000).unwrap();
        let mut spicy = sample_meal();
        spicy.name = "Arrabbiata".to_string();
        spicy.tags = vec!["pasta".to_string(), "spicy".to_string()];
        db.insert_meal(&spicy, 2000).unwrap();

        let spicy_meals = db.get_meals_by_tag("spicy").unwrap();
        assert_eq!(spicy_meals.len(), 1);
        assert_eq!(spicy_meals[0].name, "Arrabbiata");

        let pasta_meals = db.get_meals_by_tag("pasta").unwrap();
        assert_eq!(pasta_meals.len(), 2);

        assert!(db.get_meals_by_tag("dessert").unwrap().is_empty());
    }

    #[test]
    fn test_update_meal() {
        let db = Database::open_in_memory().unwrap();
        let meal = db.insert_meal(&sample_meal(), 1000).unwrap();

        let updated = db
            .update_meal(
                &meal.id,
                &UpdateMeal {
                    name: Some("Cacio e Pepe".to_string()),
                    tags: Some(vec!["pasta".to_string()]),
                    image: Some(Some("cacio.jpg".to_string())),
                    ..UpdateMeal::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Cacio e Pepe");
        assert_eq!(updated.tags, vec!["pasta"]);
        assert_eq!(updated.image.as_deref(), Some("cacio.jpg"));
        // Untouched fields survive
        assert_eq!(updated.recipe, meal.recipe);
        assert_eq!(updated.steps, meal.steps);
    }

    #[test]
    fn test_update_meal_clear_image() {
        let db = Database::open_in_memory().unwrap();
        let mut new_meal = sample_meal();
        new_meal.image = Some("old.jpg".to_string());
        let meal = db.insert_meal(&new_meal, 1000).unwrap();

        let updated = db
            .update_meal(
                &meal.id,
                &UpdateMeal {
                    image: Some(None),
                    ..UpdateMeal::default()
                },
            )
            .unwrap();
        assert_eq!(updated.image, None);
    }

    #[test]
    fn test_delete_meal_cascades() {
        let db = Database::open_in_memory().unwrap();
        let meal = db.insert_meal(&sample_meal(), 1000).unwrap();
        db.exclude_meal(&meal.id, i64::MAX).unwrap();

        assert!(db.delete_meal(&meal.id).unwrap());
        assert!(!db.delete_meal(&meal.id).unwrap());
        // Exclusion row went with the meal
        assert!(db.get_excluded_meals(0).unwrap().is_empty());
        // Tag rows too: re-inserting under a fresh id sees no stale tags
        assert!(db.get_meals_by_tag("pasta").unwrap().is_empty());
    }

    #[test]
    fn test_streak_defaults_to_zero() {
        let db = Database::open_in_memory().unwrap();
        let streak = db.get_streak().unwrap();
        assert_eq!(streak.current_count, 0);
        assert_eq!(streak.last_cooked_at, 0);
    }

    #[test]
    fn test_streak_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        db.put_streak(&Streak {
            current_count: 4,
            last_cooked_at: 1_700_000_000_000,
        })
        .unwrap();
        let streak = db.get_streak().unwrap();
        assert_eq!(streak.current_count, 4);
        assert_eq!(streak.last_cooked_at, 1_700_000_000_000);

        // Singleton: a second put replaces, never adds a row
        db.put_streak(&Streak {
            current_count: 5,
            last_cooked_at: 1_700_000_100_000,
        })
        .unwrap();
        assert_eq!(db.get_streak().unwrap().current_count, 5);
    }

    #[test]
    fn test_exclusion_expiry_filtering() {
        let db = Database::open_in_memory().unwrap();
        let past = db.insert_meal(&sample_meal(), 1000).unwrap();
        let mut other = sample_meal();
        other.name = "Ramen".to_string();
        let future = db.insert_meal(&other, 2000).unwrap();

        let now = 1_000_000;
        db.exclude_meal(&past.id, now - 1).unwrap();
        db.exclude_meal(&future.id, now + 1).unwrap();

        let excluded = db.get_excluded_meals(now).unwrap();
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].meal_id, future.id);
        assert_eq!(excluded[0].meal_name.as_deref(), Some("Ramen"));

        assert!(!db.is_meal_excluded(&past.id, now).unwrap());
        assert!(db.is_meal_excluded(&future.id, now).unwrap());
    }

    #[test]
    fn test_exclusion_boundary_is_exclusive() {
        let db = Database::open_in_memory().unwrap();
        let meal = db.insert_meal(&sample_meal(), 1000).unwrap();
        let now = 1_000_000;
        // A window expiring exactly now is already over
        db.exclude_meal(&meal.id, now).unwrap();
        assert!(!db.is_meal_excluded(&meal.id, now).unwrap());
        assert!(db.get_excluded_meals(now).unwrap().is_empty());
    }

    #[test]
    fn test_exclude_again_replaces_window() {
        let db = Database::open_in_memory().unwrap();
        let meal = db.insert_meal(&sample_meal(), 1000).unwrap();
        db.exclude_meal(&meal.id, 5000).unwrap();
        db.exclude_meal(&meal.id, 9000).unwrap();

        let excluded = db.get_excluded_meals(0).unwrap();
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].excluded_until, 9000);
    }

    #[test]
    fn test_remove_exclusion() {
        let db = Database::open_in_memory().unwrap();
        let meal = db.insert_meal(&sample_meal(), 1000).unwrap();
        db.exclude_meal(&meal.id, i64::MAX).unwrap();

        assert!(db.remove_exclusion(&meal.id).unwrap());
        assert!(!db.remove_exclusion(&meal.id).unwrap());
        assert!(!db.is_meal_excluded(&meal.id, 0).unwrap());
    }

    #[test]
    fn test_purge_expired_exclusions() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_meal(&sample_meal(), 1000).unwrap();
        let mut other = sample_meal();
        other.name = "Ramen".to_string();
        let b = db.insert_meal(&other, 2000).unwrap();

        db.exclude_meal(&a.id, 100).unwrap();
        db.exclude_meal(&b.id, 10_000).unwrap();

        assert_eq!(db.purge_expired_exclusions(5000).unwrap(), 1);
        assert!(db.is_meal_excluded(&b.id, 5000).unwrap());
    }

    #[test]
    fn test_settings_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_setting("diet_profile").unwrap().is_none());
        db.set_setting("diet_profile", "{}").unwrap();
        assert_eq!(db.get_setting("diet_profile").unwrap().as_deref(), Some("{}"));
        db.set_setting("diet_profile", "{\"x\":1}").unwrap();
        assert_eq!(
            db.get_setting("diet_profile").unwrap().as_deref(),
            Some("{\"x\":1}")
        );
    }

    #[test]
    fn test_intake_accumulates() {
        let db = Database::open_in_memory().unwrap();
        let total = db.add_intake("2026-08-07", Nutrient::Protein, 20.0).unwrap();
        assert!((total - 20.0).abs() < f64::EPSILON);
        let total = db.add_intake("2026-08-07", Nutrient::Protein, 15.5).unwrap();
        assert!((total - 35.5).abs() < f64::EPSILON);

        // Other dates stay separate
        db.add_intake("2026-08-08", Nutrient::Protein, 5.0).unwrap();
        let today = db.get_intake_for_date("2026-08-07").unwrap();
        assert_eq!(today.len(), 1);
        assert!((today[0].1 - 35.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let meal = db.insert_meal(&sample_meal(), 1000).unwrap();
        db.exclude_meal(&meal.id, 99_000).unwrap();
        db.put_streak(&Streak {
            current_count: 3,
            last_cooked_at: 50_000,
        })
        .unwrap();
        db.add_intake("2026-08-07", Nutrient::Water, 500.0).unwrap();
        let profile_json = serde_json::to_string(&DietProfile::default()).unwrap();

        let export = db.export_all(Some(&profile_json), "2026-08-07T12:00:00Z").unwrap();
        assert_eq!(export.meals.len(), 1);
        assert_eq!(export.exclusions.len(), 1);
        assert_eq!(export.intake.len(), 1);
        assert!(export.profile.is_some());

        let fresh = Database::open_in_memory().unwrap();
        let summary = fresh.import_all(&export, false).unwrap();
        assert_eq!(summary.meals_imported, 1);
        assert_eq!(summary.meals_skipped, 0);
        assert_eq!(summary.exclusions_imported, 1);
        assert_eq!(summary.intake_rows_imported, 1);
        assert!(summary.streak_updated);
        assert!(summary.profile_updated);

        let imported = fresh.get_meal(&meal.id).unwrap();
        assert_eq!(imported.name, meal.name);
        assert_eq!(imported.tags, meal.tags);
        assert!(fresh.is_meal_excluded(&meal.id, 98_999).unwrap());
        assert_eq!(fresh.get_streak().unwrap().current_count, 3);
    }

    #[test]
    fn test_import_skips_existing_meals() {
        let db = Database::open_in_memory().unwrap();
        db.insert_meal(&sample_meal(), 1000).unwrap();
        let export = db.export_all(None, "now").unwrap();

        let summary = db.import_all(&export, false).unwrap();
        assert_eq!(summary.meals_imported, 0);
        assert_eq!(summary.meals_skipped, 1);
        assert_eq!(db.get_all_meals().unwrap().len(), 1);
    }

    #[test]
    fn test_import_dry_run_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        db.insert_meal(&sample_meal(), 1000).unwrap();
        db.put_streak(&Streak {
            current_count: 2,
            last_cooked_at: 9000,
        })
        .unwrap();
        let export = db.export_all(None, "now").unwrap();

        let fresh = Database::open_in_memory().unwrap();
        let summary = fresh.import_all(&export, true).unwrap();
        assert_eq!(summary.meals_imported, 1);
        assert!(summary.streak_updated);

        assert!(fresh.get_all_meals().unwrap().is_empty());
        assert_eq!(fresh.get_streak().unwrap().current_count, 0);
    }

    #[test]
    fn test_reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("potluck.db");

        let meal_id = {
            let db = Database::open(&path).unwrap();
            let meal = db.insert_meal(&sample_meal(), 1000).unwrap();
            db.exclude_meal(&meal.id, 99_000).unwrap();
            meal.id
        };

        let db = Database::open(&path).unwrap();
        let meal = db.get_meal(&meal_id).unwrap();
        assert_eq!(meal.name, "Pasta Carbonara");
        assert_eq!(meal.tags, vec!["pasta", "quick"]);
        assert!(db.is_meal_excluded(&meal_id, 98_999).unwrap());
    }

    #[test]
    fn test_import_streak_never_moves_backwards() {
        let db = Database::open_in_memory().unwrap();
        db.put_streak(&Streak {
            current_count: 7,
            last_cooked_at: 100_000,
        })
        .unwrap();

        let stale = ExportData {
            meals: vec![],
            streak: Streak {
                current_count: 2,
                last_cooked_at: 50_000,
            },
            exclusions: vec![],
            profile: None,
            intake: vec![],
            exported_at: "then".to_string(),
        };
        let summary = db.import_all(&stale, false).unwrap();
        assert!(!summary.streak_updated);
        assert_eq!(db.get_streak().unwrap().current_count, 7);
    }
}
