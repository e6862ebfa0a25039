use anyhow::{Context, Result};
use clap::Parser;
use listing_store::sources::{sample_properties, JsonFileSource, MemorySource, RestSource};
use listing_store::{
    ControllerOptions, PropertiesController, PropertyFilters, PropertySource, StoreConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Browse real-estate listings from the command line
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON config file; LISTINGS_* environment variables are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only show listings in these cities
    #[arg(long)]
    city: Vec<String>,

    /// Only show these property types
    #[arg(long = "type")]
    property_type: Vec<String>,

    /// Only show listings having any of these amenities
    #[arg(long)]
    amenity: Vec<String>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    /// Minimum number of bedrooms
    #[arg(long)]
    bedrooms: Option<u32>,

    /// Free-text search over title, description, city and neighborhood
    #[arg(long, short)]
    query: Option<String>,

    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Write the visible page to this file as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn filters(&self) -> PropertyFilters {
        let defaults = PropertyFilters::default();
        PropertyFilters::default()
            .with_price_range(
                self.min_price.unwrap_or(defaults.price_range.0),
                self.max_price.unwrap_or(defaults.price_range.1),
            )
            .with_cities(self.city.iter().cloned())
            .with_property_types(self.property_type.iter().cloned())
            .with_amenities(self.amenity.iter().cloned())
            .with_min_bedrooms(self.bedrooms.into_iter().collect())
            .with_search(self.query.clone().unwrap_or_default())
    }
}

fn build_source(config: &StoreConfig) -> Result<Arc<dyn PropertySource>> {
    if let (Some(url), Some(key)) = (&config.api_url, &config.api_key) {
        let source =
            RestSource::new(url, key, &config.table).context("Failed to create REST source")?;
        return Ok(Arc::new(source));
    }
    if let Some(path) = &config.seed_file {
        return Ok(Arc::new(JsonFileSource::new(path)));
    }
    Ok(Arc::new(MemorySource::new(sample_properties())))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => StoreConfig::from_json_file(path)?,
        None => StoreConfig::from_env()?,
    };

    info!("🏠 Listing Store");

    let source = build_source(&config)?;
    let controller = PropertiesController::new(source, ControllerOptions::from(&config));
    info!("Using {} source", controller.source_name());

    controller.start().await;
    if !config.auto_fetch {
        controller.fetch_properties().await;
    }

    let filters = args.filters();
    if !filters.is_default() {
        controller.set_filters(filters).await;
        controller.settle().await;
    }
    if args.page != 1 {
        controller.set_page(args.page).await;
    }

    let state = controller.snapshot().await;
    if let Some(error) = &state.error {
        anyhow::bail!("Could not load listings: {error}");
    }

    info!(
        "Page {} of {} ({} matching, {} fetched, {} at source)",
        state.current_page,
        state.filtered_total_pages().max(1),
        state.filtered_count,
        state.properties.len(),
        state.all_properties_count
    );

    for (i, property) in state.filtered_properties.iter().enumerate() {
        let index = state.current_page.saturating_sub(1) * state.items_per_page + i + 1;
        println!(
            "{}. {} ({} {})",
            index, property.title, property.price.amount, property.price.currency
        );
        match property.neighborhood() {
            Some(neighborhood) => println!("   {}, {}", neighborhood, property.city()),
            None => println!("   {}", property.city()),
        }
        if let (Some(bedrooms), Some(bathrooms)) = (property.bedrooms, property.bathrooms) {
            println!("   {} bed, {} bath", bedrooms, bathrooms);
        }
        if let Some(amenities) = &property.amenities {
            println!("   Amenities: {}", amenities.join(", "));
        }
        println!("   ID: {} [{:?}]", property.id, property.status);
        println!();
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&state.filtered_properties)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved {} listings to {}", state.filtered_properties.len(), path.display());
    }

    Ok(())
}
