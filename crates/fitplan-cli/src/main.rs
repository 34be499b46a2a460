mod config;
mod exercises_cmd;
mod profile_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use fitplan_core::ProfileDraft;

use config::FitplanConfig;
use exercises_cmd::ExercisesOptions;

#[derive(Parser)]
#[command(name = "fitplan", about = "Exercise catalog, workout plan and progress tracker")]
struct Cli {
    /// Exercise catalog URL (overrides FITPLAN_CATALOG_URL env var)
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fitplan config file
    Init {
        /// API key sent as X-Api-Key on catalog requests
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Fetch and list exercises from the catalog
    Exercises {
        /// Target muscle group (e.g. chest)
        #[arg(long)]
        muscle: Option<String>,
        /// Exercise type (e.g. strength)
        #[arg(long = "type")]
        kind: Option<String>,
        /// Difficulty: beginner, intermediate or expert
        #[arg(long)]
        difficulty: Option<String>,
        /// Case-insensitive name search, applied locally
        #[arg(long)]
        search: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check profile form values; exits non-zero if any field is invalid
    ValidateProfile {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        age: String,
        /// Weight in kg
        #[arg(long, default_value = "")]
        weight: String,
        /// Height in cm
        #[arg(long, default_value = "")]
        height: String,
        /// weight_loss, muscle_gain or maintenance
        #[arg(long, default_value = "")]
        goal: String,
    },
    /// Serve the planner over HTTP
    Serve {
        /// Address to bind (defaults to config file or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (defaults to config file or 7878)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Execute the `fitplan init` command: write config file.
fn cmd_init(catalog_url: Option<&str>, api_key: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut cfg = config::ConfigFile::default();
    if let Some(url) = catalog_url {
        cfg.catalog.base_url = url.to_string();
    }
    cfg.catalog.api_key = api_key;

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  catalog.base_url = {}", cfg.catalog.base_url);
    println!("  catalog.timeout_secs = {}", cfg.catalog.timeout_secs);
    if cfg.catalog.api_key.is_some() {
        println!("  catalog.api_key = (set)");
    }
    println!("  server = {}:{}", cfg.server.bind, cfg.server.port);

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
        Commands::Init { api_key, force } => {
            cmd_init(cli.catalog_url.as_deref(), api_key, force)?;
        }
        Commands::Exercises {
            muscle,
            kind,
            difficulty,
            search,
            json,
        } => {
            let resolved = FitplanConfig::resolve(cli.catalog_url.as_deref())?;
            let options = ExercisesOptions {
                muscle,
                kind,
                difficulty,
                search,
                json,
            };
            exercises_cmd::run_exercises(&resolved.catalog()?, &options).await?;
        }
        Commands::ValidateProfile {
            name,
            age,
            weight,
            height,
            goal,
        } => {
            let draft = ProfileDraft {
                name,
                age,
                weight,
                height,
                goal,
            };
            profile_cmd::run_validate_profile(&draft)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = FitplanConfig::resolve(cli.catalog_url.as_deref())?;
            let bind = bind.unwrap_or_else(|| resolved.bind.clone());
            let port = port.unwrap_or(resolved.port);
            serve_cmd::run_serve(resolved.catalog()?, &bind, port).await?;
        }
    }

    Ok(())
}
