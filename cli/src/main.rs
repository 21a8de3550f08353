mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_cooked, cmd_exclude, cmd_exclusions, cmd_export, cmd_import, cmd_intake_log,
    cmd_intake_show, cmd_meal_add, cmd_meal_delete, cmd_meal_list, cmd_meal_show, cmd_meal_update,
    cmd_pick, cmd_profile_options, cmd_profile_set, cmd_profile_show, cmd_restore,
    cmd_shake_replay, cmd_status, cmd_streak, cmd_suggest,
};
use crate::config::Config;
use potluck_core::service::PotluckService;

#[derive(Parser)]
#[command(
    name = "potluck",
    version,
    about = "A shake-to-pick meal randomizer and nutrition companion",
    long_about = "\n\n  ██████╗  ██████╗ ████████╗██╗     ██╗   ██╗ ██████╗██╗  ██╗
  ██╔══██╗██╔═══██╗╚══██╔══╝██║     ██║   ██║██╔════╝██║ ██╔╝
  ██████╔╝██║   ██║   ██║   ██║     ██║   ██║██║     █████╔╝
  ██╔═══╝ ██║   ██║   ██║   ██║     ██║   ██║██║     ██╔═██╗
  ██║     ╚██████╔╝   ██║   ███████╗╚██████╔╝╚██████╗██║  ██╗
  ╚═╝      ╚═════╝    ╚═╝   ╚══════╝ ╚═════╝  ╚═════╝╚═╝  ╚═╝
            shake your phone, get dinner.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipe cards
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Pick a random meal from the available pool
    Pick {
        /// Only consider meals carrying this tag (e.g. "spicy")
        #[arg(short, long)]
        tag: Option<String>,
        /// Seed the picker for reproducible results
        #[arg(long)]
        seed: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a meal as cooked and move the streak
    Cooked {
        /// Meal ID
        meal_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hide a meal from picks for a while ("never this again")
    Exclude {
        /// Meal ID
        meal_id: String,
        /// Exclusion window in hours
        #[arg(long, default_value_t = potluck_core::models::DEFAULT_EXCLUDE_HOURS)]
        hours: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List currently excluded meals
    Exclusions {
        /// Also delete exclusion rows whose window has elapsed
        #[arg(long)]
        purge: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Put an excluded meal back in the pool early
    Restore {
        /// Meal ID
        meal_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the cooking streak
    Streak {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Work with recorded motion data
    Shake {
        #[command(subcommand)]
        command: ShakeCommands,
    },
    /// Manage the diet profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Log and inspect nutrient intake
    Intake {
        #[command(subcommand)]
        command: IntakeCommands,
    },
    /// Show the nutrition status card (defaults to today)
    Status {
        /// Date to show (YYYY-MM-DD or today/yesterday)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse meal suggestions
    Suggest {
        /// Only suggestions ready within this many minutes
        #[arg(long, value_name = "MINUTES")]
        max_prep: Option<u32>,
        /// Show at most this many suggestions
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the whole store as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<std::path::PathBuf>,
    },
    /// Import a previously exported JSON document
    Import {
        /// Path to the export file
        file: std::path::PathBuf,
        /// Preview the import without making changes
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MealCommands {
    /// Add a recipe card
    Add {
        /// Meal name
        name: String,
        /// Recipe overview text
        #[arg(short, long, default_value = "")]
        recipe: String,
        /// Ingredient (repeatable)
        #[arg(short, long = "ingredient", value_name = "INGREDIENT")]
        ingredients: Vec<String>,
        /// Cooking step (repeatable)
        #[arg(short, long = "step", value_name = "STEP")]
        steps: Vec<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Image path or URL
        #[arg(long)]
        image: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipe cards
    List {
        /// Only meals carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one recipe card in full
    Show {
        /// Meal ID
        meal_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a recipe card (list flags replace the whole list)
    Update {
        /// Meal ID
        meal_id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New recipe overview
        #[arg(long)]
        recipe: Option<String>,
        /// New ingredient list (repeatable; replaces)
        #[arg(short, long = "ingredient", value_name = "INGREDIENT")]
        ingredients: Option<Vec<String>>,
        /// New step list (repeatable; replaces)
        #[arg(short, long = "step", value_name = "STEP")]
        steps: Option<Vec<String>>,
        /// New tag list (repeatable; replaces)
        #[arg(short, long = "tag", value_name = "TAG")]
        tags: Option<Vec<String>>,
        /// New image path or URL
        #[arg(long)]
        image: Option<String>,
        /// Remove the image
        #[arg(long, conflicts_with = "image")]
        clear_image: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe card
    Delete {
        /// Meal ID
        meal_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ShakeCommands {
    /// Run the shake detector over a recorded motion CSV (t_ms,x,y,z)
    Replay {
        /// Path to the recording
        file: std::path::PathBuf,
        /// Pick a meal on the first trigger
        #[arg(long)]
        pick: bool,
        /// Only consider meals carrying this tag when picking
        #[arg(short, long)]
        tag: Option<String>,
        /// Seed the picker for reproducible results
        #[arg(long)]
        seed: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Set diet profile fields (only the flags you pass change)
    Set {
        /// Dietary restriction (see `profile options`)
        #[arg(long)]
        restriction: Option<String>,
        /// Diet goal (see `profile options`)
        #[arg(long)]
        goal: Option<String>,
        /// Activity level (see `profile options`)
        #[arg(long)]
        activity: Option<String>,
        /// Height in centimeters
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List valid restriction, goal, and activity values
    Options {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum IntakeCommands {
    /// Add to a day's running total for one nutrient
    Log {
        /// Nutrient: carbohydrate, protein, fat, fiber, water, vitamins, minerals
        nutrient: String,
        /// Amount in the nutrient's unit (g, ml, or mg)
        amount: f64,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show logged intake for a day
    Show {
        /// Date to show (YYYY-MM-DD or today/yesterday, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let svc = PotluckService::new(&config.db_path)?;

    match cli.command {
        Commands::Meal { command } => match command {
            MealCommands::Add {
                name,
                recipe,
                ingredients,
                steps,
                tags,
                image,
                json,
            } => cmd_meal_add(&svc, &name, &recipe, ingredients, steps, tags, image, json),
            MealCommands::List { tag, json } => cmd_meal_list(&svc, tag.as_deref(), json),
            MealCommands::Show { meal_id, json } => cmd_meal_show(&svc, &meal_id, json),
            MealCommands::Update {
                meal_id,
                name,
                recipe,
                ingredients,
                steps,
                tags,
                image,
                clear_image,
                json,
            } => cmd_meal_update(
                &svc,
                &meal_id,
                name,
                recipe,
                ingredients,
                steps,
                tags,
                image,
                clear_image,
                json,
            ),
            MealCommands::Delete { meal_id, json } => cmd_meal_delete(&svc, &meal_id, json),
        },
        Commands::Pick { tag, seed, json } => cmd_pick(&svc, tag.as_deref(), seed, json),
        Commands::Cooked { meal_id, json } => cmd_cooked(&svc, &meal_id, json),
        Commands::Exclude {
            meal_id,
            hours,
            json,
        } => cmd_exclude(&svc, &meal_id, hours, json),
        Commands::Exclusions { purge, json } => cmd_exclusions(&svc, purge, json),
        Commands::Restore { meal_id, json } => cmd_restore(&svc, &meal_id, json),
        Commands::Streak { json } => cmd_streak(&svc, json),
        Commands::Shake { command } => match command {
            ShakeCommands::Replay {
                file,
                pick,
                tag,
                seed,
                json,
            } => cmd_shake_replay(&svc, &file, pick, tag.as_deref(), seed, json),
        },
        Commands::Profile { command } => match command {
            ProfileCommands::Set {
                restriction,
                goal,
                activity,
                height,
                weight,
                json,
            } => cmd_profile_set(
                &svc,
                restriction.as_deref(),
                goal.as_deref(),
                activity.as_deref(),
                height,
                weight,
                json,
            ),
            ProfileCommands::Show { json } => cmd_profile_show(&svc, json),
            ProfileCommands::Options { json } => cmd_profile_options(json),
        },
        Commands::Intake { command } => match command {
            IntakeCommands::Log {
                nutrient,
                amount,
                date,
                json,
            } => cmd_intake_log(&svc, &nutrient, amount, date, json),
            IntakeCommands::Show { date, json } => cmd_intake_show(&svc, date, json),
        },
        Commands::Status { date, json } => cmd_status(&svc, date, json),
        Commands::Suggest {
            max_prep,
            limit,
            json,
        } => cmd_suggest(&svc, max_prep, limit, json),
        Commands::Export { output } => cmd_export(&svc, output.as_deref()),
        Commands::Import {
            file,
            dry_run,
            json,
        } => cmd_import(&svc, &file, dry_run, json),
    }
}
