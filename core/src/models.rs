use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::nutrition::Nutrient;

/// How long a skipped meal stays out of the pick pool, in hours.
pub const DEFAULT_EXCLUDE_HOURS: i64 = 168;

pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub recipe: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub recipe: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMeal {
    pub name: Option<String>,
    pub recipe: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub image: Option<Option<String>>,
}

/// Singleton cooking streak. `last_cooked_at` is 0 when nothing was ever cooked.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current_count: i64,
    pub last_cooked_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedMeal {
    pub meal_id: String,
    pub excluded_until: i64,
    // Joined field for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_name: Option<String>,
}

pub fn validate_meal_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        bail!("Meal name must not be empty");
    }
    Ok(trimmed.to_string())
}

/// Drop blank entries and surrounding whitespace from a user-supplied list.
#[must_use]
pub fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// --- Diet profile (onboarding data) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietRestriction {
    None,
    Mediterranean,
    Vegetarian,
    Vegan,
    LowCarb,
    GlutenFree,
    Keto,
    Paleo,
    Dash,
    Traditional,
    Flexitarian,
}

impl DietRestriction {
    pub const ALL: [DietRestriction; 11] = [
        DietRestriction::None,
        DietRestriction::Mediterranean,
        DietRestriction::Vegetarian,
        DietRestriction::Vegan,
        DietRestriction::LowCarb,
        DietRestriction::GlutenFree,
        DietRestriction::Keto,
        DietRestriction::Paleo,
        DietRestriction::Dash,
        DietRestriction::Traditional,
        DietRestriction::Flexitarian,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DietRestriction::None => "none",
            DietRestriction::Mediterranean => "mediterranean",
            DietRestriction::Vegetarian => "vegetarian",
            DietRestriction::Vegan => "vegan",
            DietRestriction::LowCarb => "low-carb",
            DietRestriction::GlutenFree => "gluten-free",
            DietRestriction::Keto => "keto",
            DietRestriction::Paleo => "paleo",
            DietRestriction::Dash => "dash",
            DietRestriction::Traditional => "traditional",
            DietRestriction::Flexitarian => "flexitarian",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DietRestriction::None => "None",
            DietRestriction::Mediterranean => "Mediterranean",
            DietRestriction::Vegetarian => "Vegetarian",
            DietRestriction::Vegan => "Vegan",
            DietRestriction::LowCarb => "Low-Carb",
            DietRestriction::GlutenFree => "Gluten-Free",
            DietRestriction::Keto => "Keto",
            DietRestriction::Paleo => "Paleo",
            DietRestriction::Dash => "DASH",
            DietRestriction::Traditional => "Traditional",
            DietRestriction::Flexitarian => "Flexitarian",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            DietRestriction::None => "No dietary restrictions",
            DietRestriction::Mediterranean => "Primarily fish and plant-based",
            DietRestriction::Vegetarian => "No meat products",
            DietRestriction::Vegan => "Excludes all animal products",
            DietRestriction::LowCarb => "Reduced carbohydrate intake",
            DietRestriction::GlutenFree => "Excludes gluten-containing foods",
            DietRestriction::Keto => "High fat, very low carbs",
            DietRestriction::Paleo => "Focuses on whole foods",
            DietRestriction::Dash => "Dietary Approaches to Stop Hypertension",
            DietRestriction::Traditional => "Classic home-cooked style",
            DietRestriction::Flexitarian => "Mostly plant-based, occasional meat",
        }
    }
}

pub fn parse_restriction(s: &str) -> Result<DietRestriction> {
    DietRestriction::ALL
        .into_iter()
        .find(|r| r.as_str() == s.to_lowercase())
        .ok_or_else(|| {
            let valid: Vec<&str> = DietRestriction::ALL.iter().map(|r| r.as_str()).collect();
            anyhow::anyhow!("Unknown restriction '{s}'. Valid: {}", valid.join(", "))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietGoal {
    LoseWeight,
    BuildMuscle,
    MaintainWeight,
    ImproveHealth,
    GainWeight,
}

impl DietGoal {
    pub const ALL: [DietGoal; 5] = [
        DietGoal::LoseWeight,
        DietGoal::BuildMuscle,
        DietGoal::MaintainWeight,
        DietGoal::ImproveHealth,
        DietGoal::GainWeight,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DietGoal::LoseWeight => "lose-weight",
            DietGoal::BuildMuscle => "build-muscle",
            DietGoal::MaintainWeight => "maintain-weight",
            DietGoal::ImproveHealth => "improve-health",
            DietGoal::GainWeight => "gain-weight",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DietGoal::LoseWeight => "Lose weight",
            DietGoal::BuildMuscle => "Build muscle",
            DietGoal::MaintainWeight => "Maintain weight",
            DietGoal::ImproveHealth => "Improve health",
            DietGoal::GainWeight => "Gain weight",
        }
    }
}

pub fn parse_goal(s: &str) -> Result<DietGoal> {
    DietGoal::ALL
        .into_iter()
        .find(|g| g.as_str() == s.to_lowercase())
        .ok_or_else(|| {
            let valid: Vec<&str> = DietGoal::ALL.iter().map(|g| g.as_str()).collect();
            anyhow::anyhow!("Unknown goal '{s}'. Valid: {}", valid.join(", "))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very-active",
        }
    }

    /// Multiplier applied to energy-bearing minimum intakes.
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.0,
            ActivityLevel::Light => 1.1,
            ActivityLevel::Moderate => 1.2,
            ActivityLevel::Active => 1.3,
            ActivityLevel::VeryActive => 1.4,
        }
    }
}

pub fn parse_activity(s: &str) -> Result<ActivityLevel> {
    ActivityLevel::ALL
        .into_iter()
        .find(|a| a.as_str() == s.to_lowercase())
        .ok_or_else(|| {
            let valid: Vec<&str> = ActivityLevel::ALL.iter().map(|a| a.as_str()).collect();
            anyhow::anyhow!("Unknown activity level '{s}'. Valid: {}", valid.join(", "))
        })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietProfile {
    pub restriction: DietRestriction,
    pub goal: DietGoal,
    pub activity: ActivityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

impl Default for DietProfile {
    fn default() -> Self {
        DietProfile {
            restriction: DietRestriction::None,
            goal: DietGoal::MaintainWeight,
            activity: ActivityLevel::Sedentary,
            height_cm: None,
            weight_kg: None,
        }
    }
}

// --- Intake ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeRow {
    pub date: String,
    pub nutrient: Nutrient,
    pub amount: f64,
}

// --- Export / Import ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub meals: Vec<Meal>,
    pub streak: Streak,
    pub exclusions: Vec<ExcludedMeal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<DietProfile>,
    #[serde(default)]
    pub intake: Vec<IntakeRow>,
    pub exported_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub meals_imported: usize,
    pub meals_skipped: usize,
    pub exclusions_imported: usize,
    pub intake_rows_imported: usize,
    pub streak_updated: bool,
    pub profile_updated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_meal_name() {
        assert_eq!(validate_meal_name("  Pasta Carbonara ").unwrap(), "Pasta Carbonara");
        assert!(validate_meal_name("").is_err());
        assert!(validate_meal_name("   ").is_err());
    }

    #[test]
    fn test_clean_list() {
        let items = vec![
            "  eggs ".to_string(),
            String::new(),
            "guanciale".to_string(),
            "   ".to_string(),
        ];
        assert_eq!(clean_list(&items), vec!["eggs", "guanciale"]);
    }

    #[test]
    fn test_parse_restriction() {
        assert_eq!(
            parse_restriction("gluten-free").unwrap(),
            DietRestriction::GlutenFree
        );
        assert_eq!(parse_restriction("KETO").unwrap(), DietRestriction::Keto);
        assert!(parse_restriction("carnivore").is_err());
    }

    #[test]
    fn test_parse_goal() {
        assert_eq!(parse_goal("build-muscle").unwrap(), DietGoal::BuildMuscle);
        assert!(parse_goal("bulk").is_err());
    }

    #[test]
    fn test_parse_activity() {
        assert_eq!(parse_activity("very-active").unwrap(), ActivityLevel::VeryActive);
        assert!(parse_activity("couch").is_err());
    }

    #[test]
    fn test_activity_factors_ascend() {
        let factors: Vec<f64> = ActivityLevel::ALL.iter().map(|a| a.factor()).collect();
        assert!(factors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_profile_roundtrip_json() {
        let profile = DietProfile {
            restriction: DietRestriction::LowCarb,
            goal: DietGoal::LoseWeight,
            activity: ActivityLevel::Moderate,
            height_cm: Some(178.0),
            weight_kg: Some(74.5),
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("low-carb"));
        let back: DietProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.restriction, DietRestriction::LowCarb);
        assert_eq!(back.goal, DietGoal::LoseWeight);
        assert_eq!(back.activity, ActivityLevel::Moderate);
    }
}
