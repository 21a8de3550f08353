use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{DietGoal, DietProfile};

/// The seven rows of the nutrition status card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Carbohydrate,
    Protein,
    Fat,
    Fiber,
    Water,
    Vitamins,
    Minerals,
}

impl Nutrient {
    pub const ALL: [Nutrient; 7] = [
        Nutrient::Carbohydrate,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Water,
        Nutrient::Vitamins,
        Nutrient::Minerals,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Nutrient::Carbohydrate => "carbohydrate",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Fiber => "fiber",
            Nutrient::Water => "water",
            Nutrient::Vitamins => "vitamins",
            Nutrient::Minerals => "minerals",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Nutrient::Carbohydrate => "Carbohydrates",
            Nutrient::Protein => "Proteins",
            Nutrient::Fat => "Fat",
            Nutrient::Fiber => "Fiber",
            Nutrient::Water => "Water",
            Nutrient::Vitamins => "Vitamins",
            Nutrient::Minerals => "Minerals",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Carbohydrate | Nutrient::Protein | Nutrient::Fat | Nutrient::Fiber => "g",
            Nutrient::Water => "ml",
            Nutrient::Vitamins | Nutrient::Minerals => "mg",
        }
    }

    /// Baseline daily minimum, before profile scaling. FDA daily-value figures.
    #[must_use]
    pub fn baseline_minimum(self) -> f64 {
        match self {
            Nutrient::Carbohydrate => 275.0,
            Nutrient::Protein => 50.0,
            Nutrient::Fat => 78.0,
            Nutrient::Fiber => 28.0,
            Nutrient::Water => 2700.0,
            Nutrient::Vitamins => 90.0,
            Nutrient::Minerals => 1000.0,
        }
    }

    /// Vitamins and minerals do not scale with activity; the rest do.
    #[must_use]
    fn scales_with_activity(self) -> bool {
        !matches!(self, Nutrient::Vitamins | Nutrient::Minerals)
    }
}

pub fn parse_nutrient(s: &str) -> Result<Nutrient> {
    Nutrient::ALL
        .into_iter()
        .find(|n| n.as_str() == s.to_lowercase())
        .ok_or_else(|| {
            let valid: Vec<&str> = Nutrient::ALL.iter().map(|n| n.as_str()).collect();
            anyhow::anyhow!("Unknown nutrient '{s}'. Valid: {}", valid.join(", "))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Critical,
    Low,
    Normal,
}

impl NutrientLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NutrientLevel::Critical => "critical",
            NutrientLevel::Low => "low",
            NutrientLevel::Normal => "normal",
        }
    }
}

/// Classify a percent-of-minimum into a card level:
/// 0-30 critical, 31-60 low, 61+ normal.
#[must_use]
pub fn level_for_percent(percent: f64) -> NutrientLevel {
    let clamped = percent.clamp(0.0, 100.0);
    if clamped <= 30.0 {
        NutrientLevel::Critical
    } else if clamped <= 60.0 {
        NutrientLevel::Low
    } else {
        NutrientLevel::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Default,
    Success,
    Info,
    Warning,
    Destructive,
}

impl AlertSeverity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Default => "default",
            AlertSeverity::Success => "success",
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Destructive => "destructive",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NutrientAlert {
    pub message: String,
    pub severity: AlertSeverity,
}

#[derive(Debug, Clone, Serialize)]
pub struct NutrientStatus {
    pub nutrient: Nutrient,
    pub amount: f64,
    pub unit: &'static str,
    /// Raw percent of the minimum; can exceed 100.
    pub percent: f64,
    pub level: NutrientLevel,
    pub minimum: f64,
    pub alert: NutrientAlert,
}

/// Daily minimum for one nutrient under a given profile.
#[must_use]
pub fn minimum_for(nutrient: Nutrient, profile: &DietProfile) -> f64 {
    let mut minimum = nutrient.baseline_minimum();
    if nutrient.scales_with_activity() {
        minimum *= profile.activity.factor();
    }
    // Muscle-building and weight-gain goals push protein up.
    if nutrient == Nutrient::Protein
        && matches!(profile.goal, DietGoal::BuildMuscle | DietGoal::GainWeight)
    {
        minimum *= 1.4;
    }
    minimum
}

fn alert_for(nutrient: Nutrient, level: NutrientLevel, minimum: f64) -> NutrientAlert {
    let name = nutrient.display_name();
    let unit = nutrient.unit();
    match level {
        NutrientLevel::Critical => NutrientAlert {
            message: format!(
                "{name} intake is critically low. Aim for at least {minimum:.0}{unit} today."
            ),
            severity: AlertSeverity::Destructive,
        },
        NutrientLevel::Low => NutrientAlert {
            message: format!(
                "{name} intake is below target — {minimum:.0}{unit} is the daily minimum."
            ),
            severity: AlertSeverity::Warning,
        },
        NutrientLevel::Normal => NutrientAlert {
            message: format!("{name} intake is on track."),
            severity: AlertSeverity::Success,
        },
    }
}

/// Build the full status card: one row per tracked nutrient, with logged
/// intake joined against the profile-scaled minimum (0 when nothing logged).
#[must_use]
pub fn build_status(profile: &DietProfile, intake: &[(Nutrient, f64)]) -> Vec<NutrientStatus> {
    Nutrient::ALL
        .into_iter()
        .map(|nutrient| {
            let amount = intake
                .iter()
                .find(|(n, _)| *n == nutrient)
                .map_or(0.0, |(_, a)| *a);
            let minimum = minimum_for(nutrient, profile);
            let percent = if minimum > 0.0 {
                amount / minimum * 100.0
            } else {
                0.0
            };
            let level = level_for_percent(percent);
            NutrientStatus {
                nutrient,
                amount,
                unit: nutrient.unit(),
                percent,
                level,
                minimum,
                alert: alert_for(nutrient, level, minimum),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, DietRestriction};

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_percent(0.0), NutrientLevel::Critical);
        assert_eq!(level_for_percent(30.0), NutrientLevel::Critical);
        assert_eq!(level_for_percent(31.0), NutrientLevel::Low);
        assert_eq!(level_for_percent(60.0), NutrientLevel::Low);
        assert_eq!(level_for_percent(61.0), NutrientLevel::Normal);
        assert_eq!(level_for_percent(100.0), NutrientLevel::Normal);
        // Over-100 percents classify as normal, not out of range
        assert_eq!(level_for_percent(140.0), NutrientLevel::Normal);
    }

    #[test]
    fn test_parse_nutrient() {
        assert_eq!(parse_nutrient("protein").unwrap(), Nutrient::Protein);
        assert_eq!(parse_nutrient("WATER").unwrap(), Nutrient::Water);
        assert!(parse_nutrient("caffeine").is_err());
    }

    #[test]
    fn test_minimum_scales_with_activity() {
        let mut profile = DietProfile::default();
        let base = minimum_for(Nutrient::Carbohydrate, &profile);
        profile.activity = ActivityLevel::VeryActive;
        let scaled = minimum_for(Nutrient::Carbohydrate, &profile);
        assert!((scaled - base * 1.4).abs() < 0.01);

        // Micronutrients stay fixed
        let vitamins = minimum_for(Nutrient::Vitamins, &profile);
        assert!((vitamins - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_protein_goal_bump() {
        let profile = DietProfile {
            restriction: DietRestriction::None,
            goal: DietGoal::BuildMuscle,
            activity: ActivityLevel::Sedentary,
            height_cm: None,
            weight_kg: None,
        };
        let minimum = minimum_for(Nutrient::Protein, &profile);
        assert!((minimum - 70.0).abs() < 0.01);
    }

    #[test]
    fn test_build_status_covers_all_nutrients() {
        let profile = DietProfile::default();
        let statuses = build_status(&profile, &[]);
        assert_eq!(statuses.len(), 7);
        assert!(statuses.iter().all(|s| s.level == NutrientLevel::Critical));
        assert!(
            statuses
                .iter()
                .all(|s| s.alert.severity == AlertSeverity::Destructive)
        );
    }

    #[test]
    fn test_build_status_joins_intake() {
        let profile = DietProfile::default();
        // 50g protein against a 50g minimum: 100%, normal
        let statuses = build_status(&profile, &[(Nutrient::Protein, 50.0)]);
        let protein = statuses
            .iter()
            .find(|s| s.nutrient == Nutrient::Protein)
            .unwrap();
        assert!((protein.percent - 100.0).abs() < 0.01);
        assert_eq!(protein.level, NutrientLevel::Normal);
        assert_eq!(protein.alert.severity, AlertSeverity::Success);

        // Unlogged rows sit at zero
        let water = statuses
            .iter()
            .find(|s| s.nutrient == Nutrient::Water)
            .unwrap();
        assert!((water.amount - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_not_clamped_in_output() {
        let profile = DietProfile::default();
        let statuses = build_status(&profile, &[(Nutrient::Fiber, 56.0)]);
        let fiber = statuses
            .iter()
            .find(|s| s.nutrient == Nutrient::Fiber)
            .unwrap();
        assert!((fiber.percent - 200.0).abs() < 0.01);
        assert_eq!(fiber.level, NutrientLevel::Normal);
    }
}
