use serde::Serialize;

/// One entry of the built-in suggestion catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MealSuggestion {
    pub name: &'static str,
    pub prep_time_seconds: u32,
    /// Share of a day's nutrition needs this meal covers.
    pub satisfaction_percent: u8,
}

pub const SUGGESTIONS: &[MealSuggestion] = &[
    MealSuggestion {
        name: "Avocado Toast",
        prep_time_seconds: 300,
        satisfaction_percent: 18,
    },
    MealSuggestion {
        name: "Chicken Caesar Salad",
        prep_time_seconds: 450,
        satisfaction_percent: 22,
    },
    MealSuggestion {
        name: "Greek Yogurt Parfait",
        prep_time_seconds: 180,
        satisfaction_percent: 14,
    },
    MealSuggestion {
        name: "Beef Burrito Bowl",
        prep_time_seconds: 900,
        satisfaction_percent: 29,
    },
    MealSuggestion {
        name: "Quinoa Veggie Salad",
        prep_time_seconds: 480,
        satisfaction_percent: 21,
    },
    MealSuggestion {
        name: "Turkey Sandwich",
        prep_time_seconds: 350,
        satisfaction_percent: 17,
    },
    MealSuggestion {
        name: "Egg Omelette",
        prep_time_seconds: 420,
        satisfaction_percent: 16,
    },
    MealSuggestion {
        name: "Tofu Stir Fry",
        prep_time_seconds: 720,
        satisfaction_percent: 24,
    },
    MealSuggestion {
        name: "Berry Smoothie Bowl",
        prep_time_seconds: 240,
        satisfaction_percent: 13,
    },
    MealSuggestion {
        name: "Salmon Sushi",
        prep_time_seconds: 650,
        satisfaction_percent: 20,
    },
    MealSuggestion {
        name: "Hummus Wrap",
        prep_time_seconds: 360,
        satisfaction_percent: 19,
    },
    MealSuggestion {
        name: "Shrimp Pad Thai",
        prep_time_seconds: 780,
        satisfaction_percent: 26,
    },
    MealSuggestion {
        name: "Classic BLT",
        prep_time_seconds: 350,
        satisfaction_percent: 15,
    },
    MealSuggestion {
        name: "Butternut Squash Soup",
        prep_time_seconds: 900,
        satisfaction_percent: 18,
    },
    MealSuggestion {
        name: "Margherita Pizza",
        prep_time_seconds: 900,
        satisfaction_percent: 23,
    },
    MealSuggestion {
        name: "Chicken Curry Bowl",
        prep_time_seconds: 1100,
        satisfaction_percent: 28,
    },
    MealSuggestion {
        name: "Veggie Pasta",
        prep_time_seconds: 800,
        satisfaction_percent: 22,
    },
    MealSuggestion {
        name: "Pancake Stack",
        prep_time_seconds: 500,
        satisfaction_percent: 14,
    },
    MealSuggestion {
        name: "Seared Tuna Salad",
        prep_time_seconds: 650,
        satisfaction_percent: 25,
    },
    MealSuggestion {
        name: "Falafel Bowl",
        prep_time_seconds: 600,
        satisfaction_percent: 19,
    },
];

/// Catalog entries under the prep-time cap, best nutrition coverage first
/// (ties broken by name for stable output).
#[must_use]
pub fn suggestions(max_prep_seconds: Option<u32>, limit: Option<usize>) -> Vec<&'static MealSuggestion> {
    let mut out: Vec<&MealSuggestion> = SUGGESTIONS
        .iter()
        .filter(|s| max_prep_seconds.is_none_or(|max| s.prep_time_seconds <= max))
        .collect();
    out.sort_by(|a, b| {
        b.satisfaction_percent
            .cmp(&a.satisfaction_percent)
            .then_with(|| a.name.cmp(b.name))
    });
    if let Some(limit) = limit {
        out.truncate(limit);
    }
    out
}
