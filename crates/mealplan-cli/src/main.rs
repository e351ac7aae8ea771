mod config;
mod ingredients_cmd;
mod plan_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use mealplan_core::{Catalog, Planner};

use config::{CliOverrides, MealplanConfig};

#[derive(Parser)]
#[command(name = "mealplan", about = "Daily meal plan composer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a mealplan config file
    Init {
        /// Address the server binds to
        #[arg(long, default_value = config::DEFAULT_BIND)]
        bind: String,
        /// Port the server listens on
        #[arg(long, default_value_t = config::DEFAULT_PORT)]
        port: u16,
        /// Fixed seed for reproducible plans
        #[arg(long)]
        seed: Option<u64>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides MEALPLAN_BIND and the config file)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides MEALPLAN_PORT and the config file)
        #[arg(long)]
        port: Option<u16>,
        /// Default seed for requests that carry none
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Compose a day plan and print it
    Plan {
        /// Comma-separated catalog ids (e.g. "coffee,cod,zucchini")
        #[arg(long, value_delimiter = ',')]
        ingredients: Vec<String>,
        /// Daily calorie target
        #[arg(long, allow_negative_numbers = true)]
        calories: f64,
        /// Seed for reproducible plans
        #[arg(long)]
        seed: Option<u64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the ingredients available for each meal
    Ingredients {
        /// Only list one meal (e.g. "lunch")
        #[arg(long)]
        meal: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Execute the `mealplan init` command: write config file.
fn cmd_init(bind: &str, port: u16, seed: Option<u64>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        server: config::ServerSection {
            bind: bind.to_string(),
            port,
        },
        planner: config::PlannerSection { seed },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  server.bind = {bind}");
    println!("  server.port = {port}");
    if let Some(seed) = seed {
        println!("  planner.seed = {seed}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            bind,
            port,
            seed,
            force,
        } => {
            cmd_init(&bind, port, seed, force)?;
        }
        Commands::Serve { bind, port, seed } => {
            let resolved = MealplanConfig::resolve(&CliOverrides { bind, port, seed })?;
            let state = serve_cmd::AppState::new(Planner::builtin(), resolved.seed);
            serve_cmd::run_serve(state, &resolved.bind, resolved.port).await?;
        }
        Commands::Plan {
            ingredients,
            calories,
            seed,
            json,
        } => {
            let resolved = MealplanConfig::resolve(&CliOverrides {
                seed,
                ..Default::default()
            })?;
            plan_cmd::run_plan(
                &Planner::builtin(),
                &ingredients,
                calories,
                resolved.seed,
                json,
            )?;
        }
        Commands::Ingredients { meal, json } => {
            ingredients_cmd::run_ingredients(Catalog::builtin(), meal.as_deref(), json)?;
        }
    }

    Ok(())
}
