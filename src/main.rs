use anyhow::Result;
use clap::{Parser, Subcommand};
use cookease::catalog::{CatalogLoader, CatalogOrigin, CatalogSource, LoadOutcome, RecipeCache};
use cookease::frontend::{recipe_card, recipe_detail, ConsoleFrontend};
use cookease::integration::{AssistantConfig, OrchestratorBuilder};
use cookease::speech::highlight::word_interval_ms;
use cookease::storage::PreferenceStore;
use cookease::CookeaseError;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cookease - hands-free recipe steps and kitchen timers
#[derive(Parser)]
#[command(name = "cookease", version, about)]
struct Cli {
    /// Recipe document: a file path or an http(s) URL
    #[arg(long, env = "COOKEASE_CATALOG")]
    catalog: Option<String>,

    /// Directory for the recipe cache and preferences
    #[arg(long, env = "COOKEASE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// TOML file with configuration overrides
    #[arg(short, long, env = "COOKEASE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List recipe cards
    List {
        /// Only recipes whose title or ingredients contain this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Print one recipe with its share text
    Show {
        /// Recipe title, or part of it
        title: String,
    },
    /// Start an interactive cooking session (the default)
    Cook {
        /// Recipe to open first
        #[arg(short, long)]
        recipe: Option<String>,

        /// Type commands instead of speaking them
        #[arg(long)]
        no_voice: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "cookease=warn",
        1 => "cookease=info,warn",
        _ => "cookease=debug,info",
    };

    // Logs go to stderr so they do not interleave with the session output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => AssistantConfig::from_toml_file(path).map_err(report)?,
        None => AssistantConfig::default(),
    };
    if let Some(catalog) = cli.catalog.clone() {
        config = config.with_catalog(catalog);
    }
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }
    config.validate().map_err(report)?;

    match cli.command.unwrap_or(Command::Cook {
        recipe: None,
        no_voice: false,
    }) {
        Command::List { search } => {
            let outcome = load_catalog(&config).await;
            let term = search.unwrap_or_default();
            let recipes = outcome.catalog.filter(&term);
            if recipes.is_empty() {
                println!("No recipes found");
            }
            for (i, recipe) in recipes.into_iter().enumerate() {
                println!("{}", recipe_card(i + 1, recipe));
            }
        }
        Command::Show { title } => {
            let outcome = load_catalog(&config).await;
            let Some(recipe) = outcome
                .catalog
                .find_by_title(&title)
                .and_then(|i| outcome.catalog.get(i))
            else {
                anyhow::bail!("No recipe named {}", title);
            };
            println!("{}", recipe_detail(recipe));
            println!("--- share ---\n{}", recipe.share_text());
        }
        Command::Cook { recipe, no_voice } => {
            if let Some(title) = recipe {
                config = config.with_initial_recipe(title);
            }
            if no_voice {
                config = config.without_voice_input();
            }
            cook(config).await?;
        }
    }

    Ok(())
}

async fn load_catalog(config: &AssistantConfig) -> LoadOutcome {
    let outcome = CatalogLoader::new(CatalogSource::parse(&config.catalog))
        .with_cache(RecipeCache::in_dir(&config.data_dir))
        .with_max_cache_age(config.cache_max_age())
        .load()
        .await;

    match &outcome.origin {
        CatalogOrigin::Source => info!("Loaded {} recipes", outcome.catalog.len()),
        CatalogOrigin::Cache { age_minutes } => println!(
            "Offline: using recipes saved {} minutes ago",
            age_minutes
        ),
        CatalogOrigin::Unavailable { reason } => {
            warn!("No recipes available: {}", reason);
            println!("Recipes are unavailable right now.");
        }
    }
    outcome
}

async fn cook(config: AssistantConfig) -> Result<()> {
    info!("Starting Cookease");

    let outcome = load_catalog(&config).await;
    for (i, recipe) in outcome.catalog.recipes().iter().enumerate() {
        println!("{}", recipe_card(i + 1, recipe));
    }

    let interval = word_interval_ms(config.words_per_minute);
    let play_tone = config.enable_tone;
    let (orchestrator, handle) = OrchestratorBuilder::new()
        .with_preferences(PreferenceStore::in_dir(&config.data_dir))
        .with_config(config)
        .with_catalog(outcome.catalog)
        .build()
        .map_err(report)?;

    let frontend = ConsoleFrontend::new(handle, interval, play_tone);
    let pump = frontend.spawn_event_pump().map_err(report)?;
    let worker = orchestrator.start().map_err(report)?;

    frontend.run_input().await.map_err(report)?;

    if worker.join().is_err() {
        warn!("Session thread panicked");
    }
    if pump.join().is_err() {
        warn!("Console thread panicked");
    }
    Ok(())
}

/// Print the user-facing text, keep the details in the log
fn report(e: CookeaseError) -> anyhow::Error {
    if e.is_recoverable() {
        warn!("{}", e);
    } else {
        error!("{}", e);
    }
    eprintln!("{}", e.user_message());
    e.into()
}
