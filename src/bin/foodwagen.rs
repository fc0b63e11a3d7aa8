//! Command-line client for the FoodWagen catalog
//!
//! Usage: foodwagen [--config FILE] [--base-url URL] <COMMAND>
//!   list | search QUERY | add ... | edit ID ... | delete ID | seed [--reset]
//!
//! Ctrl-C cancels the request in flight.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use foodwagen::prelude::*;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "foodwagen", about = "Browse and edit the FoodWagen food catalog")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every meal
    List {
        /// Print normalized records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find meals by food or restaurant name
    Search { query: String },
    /// Add a meal
    Add(MealArgs),
    /// Edit a meal; unspecified fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        meal: MealArgs,
    },
    /// Delete a meal
    Delete { id: String },
    /// Load meals from a YAML file
    Seed {
        #[arg(long, default_value = "data/seed.yaml")]
        file: PathBuf,
        /// Delete every existing meal first
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Args)]
struct MealArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    rating: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    restaurant: Option<String>,
    #[arg(long)]
    logo: Option<String>,
    /// "Open Now" or "Closed"
    #[arg(long)]
    status: Option<String>,
}

impl MealArgs {
    fn apply(self, mut form: FoodFormData) -> FoodFormData {
        if let Some(v) = self.name {
            form.food_name = Some(v);
        }
        if let Some(v) = self.rating {
            form.food_rating = Some(FormNumber::Text(v));
        }
        if let Some(v) = self.image {
            form.food_image = Some(v);
        }
        if let Some(v) = self.price {
            form.food_price = Some(FormNumber::Text(v));
        }
        if let Some(v) = self.restaurant {
            form.restaurant_name = Some(v);
        }
        if let Some(v) = self.logo {
            form.restaurant_logo = Some(v);
        }
        if let Some(v) = self.status {
            form.restaurant_status = Some(v);
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("foodwagen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    }
    .apply_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }

    let api = Arc::new(HttpFoodApi::new(config.clone())?);
    let cache = FoodCache::new(api, config);

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Command::List { json } => {
            let foods = cache
                .foods(&cancel)
                .await
                .map_err(|e| fail(e, Action::Load))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&foods)?);
            } else {
                print_foods(&foods);
            }
        }
        Command::Search { query } => {
            let foods = cache
                .search(&query, &cancel)
                .await
                .map_err(|e| fail(e, Action::Search))?;
            print_foods(&foods);
        }
        Command::Add(meal) => {
            let form = meal.apply(FoodFormData::blank());
            submit(&cache, &form, None, &cancel).await?;
        }
        Command::Edit { id, meal } => {
            let foods = cache
                .foods(&cancel)
                .await
                .map_err(|e| fail(e, Action::Load))?;
            let Some(current) = foods.iter().find(|f| f.id == id) else {
                bail!("no meal with id {}", id);
            };
            let form = meal.apply(FoodFormData::from_record(current));
            submit(&cache, &form, Some(id.as_str()), &cancel).await?;
        }
        Command::Delete { id } => {
            cache
                .delete(&id, &cancel)
                .await
                .map_err(|e| fail(e, Action::Delete))?;
            println!("Meal deleted successfully!");
        }
        Command::Seed { file, reset } => seed(&cache, &file, reset, &cancel).await?,
    }

    Ok(())
}

fn fail(error: FoodError, action: Action) -> anyhow::Error {
    tracing::debug!(code = error.error_code(), error = %error, "command failed");
    anyhow::anyhow!(error.user_message(action))
}

async fn submit(
    cache: &FoodCache,
    form: &FoodFormData,
    target: Option<&str>,
    cancel: &CancelToken,
) -> Result<()> {
    match cache.submit(form, target, cancel).await {
        Ok(outcome) => {
            println!("{} (id {})", outcome.notice(), outcome.record().id);
            Ok(())
        }
        Err(SubmitError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field.name(), message);
            }
            bail!("{} invalid field(s)", errors.len())
        }
        Err(e) => bail!(e.user_message()),
    }
}

async fn seed(cache: &FoodCache, file: &Path, reset: bool, cancel: &CancelToken) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let forms: Vec<FoodFormData> =
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", file.display()))?;

    if reset {
        let existing = cache.foods(cancel).await?;
        tracing::info!(count = existing.len(), "removing existing meals");
        try_join_all(existing.iter().map(|food| cache.delete(&food.id, cancel))).await?;
    }

    let mut added = 0;
    for form in &forms {
        match cache.submit(form, None, cancel).await {
            Ok(outcome) => {
                added += 1;
                tracing::debug!(id = %outcome.record().id, "seeded");
            }
            Err(SubmitError::Invalid(errors)) => {
                tracing::warn!(name = ?form.food_name, %errors, "skipping invalid seed entry");
            }
            Err(SubmitError::Failed(e)) => return Err(e.into()),
        }
    }
    println!("Seeded {} of {} meals", added, forms.len());
    Ok(())
}

fn print_foods(foods: &[FoodRecord]) {
    if foods.is_empty() {
        println!("No meals found");
        return;
    }
    for food in foods {
        println!(
            "{:>4}  {:<28} {:>5}  {:>8}  {} ({})",
            food.id,
            food.name,
            food.display_rating(),
            food.display_price().unwrap_or_else(|| "-".to_string()),
            food.restaurant.name,
            food.restaurant.status,
        );
    }
}
