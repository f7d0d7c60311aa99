//! Ad Select CLI — load an advertisement catalog and pick the ad to render
//! for a customer on a marketplace.

use std::sync::Arc;

use adselect_core::config::AppConfig;
use adselect_selection::AdvertisementSelectionLogic;
use adselect_store::Catalog;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "adselect")]
#[command(about = "Targeting-filtered, CTR-ranked advertisement selection")]
#[command(version)]
struct Cli {
    /// Catalog JSON file (overrides config)
    #[arg(long, env = "ADSELECT__CATALOG__PATH")]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select the single advertisement to render
    Select {
        /// Customer id; omit for anonymous selection
        #[arg(short, long)]
        customer_id: Option<String>,

        /// Marketplace id (defaults to the configured marketplace)
        #[arg(short, long)]
        marketplace_id: Option<String>,
    },

    /// List every eligible candidate, best first
    Rank {
        #[arg(short, long)]
        customer_id: Option<String>,

        #[arg(short, long)]
        marketplace_id: Option<String>,
    },

    /// Check that the catalog parses and is internally consistent
    Validate,
}

#[derive(Serialize)]
struct RankedRow<'a> {
    rank: usize,
    content_id: &'a str,
    rank_key: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });
    if let Some(path) = cli.catalog {
        config.catalog.path = path;
    }

    init_tracing(&config);

    let catalog = Catalog::load(&config.catalog.path)
        .with_context(|| format!("loading catalog {}", config.catalog.path))?;

    match cli.command {
        Commands::Validate => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "contents": catalog.contents.len(),
                    "targeting_groups": catalog.targeting_groups.len(),
                    "customer_profiles": catalog.customer_profiles.len(),
                })
            );
        }
        Commands::Select {
            customer_id,
            marketplace_id,
        } => {
            let logic = build_logic(catalog)?;
            let marketplace_id =
                marketplace_id.unwrap_or_else(|| config.selection.default_marketplace_id.clone());
            let ad = logic.select_advertisement(customer_id.as_deref(), Some(&marketplace_id))?;
            info!(
                marketplace_id = %marketplace_id,
                content_id = ad.content_id().unwrap_or("<none>"),
                "Advertisement selected"
            );
            println!("{}", serde_json::to_string_pretty(&ad)?);
        }
        Commands::Rank {
            customer_id,
            marketplace_id,
        } => {
            let logic = build_logic(catalog)?;
            let marketplace_id =
                marketplace_id.unwrap_or_else(|| config.selection.default_marketplace_id.clone());
            let ranked = logic.rank_candidates(customer_id.as_deref(), Some(&marketplace_id))?;
            let rows: Vec<RankedRow<'_>> = ranked
                .iter()
                .enumerate()
                .map(|(i, c)| RankedRow {
                    rank: i + 1,
                    content_id: &c.content.content_id,
                    rank_key: c.rank_key,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}

fn build_logic(catalog: Catalog) -> anyhow::Result<AdvertisementSelectionLogic> {
    let (contents, groups, profiles) = catalog.into_stores()?;
    Ok(
        AdvertisementSelectionLogic::new(Arc::new(contents), Arc::new(groups))
            .with_profile_source(Arc::new(profiles)),
    )
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.as_str().into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
