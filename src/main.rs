use anyhow::Context;
use landhub::api::{PlotApi, PlotService};
use landhub::health::HealthMonitor;
use landhub::management::PlotManagementService;
use landhub::map::{MapView, PlotDetails};
use landhub::Config;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    info!("🗺️  LandHub plot map");
    info!("API: {}", config.api_base_url);

    let api: Arc<dyn PlotApi> =
        Arc::new(PlotService::new(&config).context("Failed to create HTTP client")?);

    let health = HealthMonitor::new(Arc::clone(&api));
    if !health.is_alive().await {
        warn!("Backend liveness check failed, trying anyway");
    } else if !health.wait_until_ready().await {
        warn!("Database not ready, plot data may be incomplete");
    }

    let management = Arc::new(PlotManagementService::new(
        Arc::clone(&api),
        config.order_cache_ttl,
    ));
    let mut map = MapView::new(api, management, config.map.clone());

    map.initialize().await.context("Failed to load plots")?;

    // Display results
    info!("✅ Loaded {} plots\n", map.plots().len());

    for (i, plot) in map.plots().iter().enumerate() {
        let details = PlotDetails::from_plot(plot);
        println!("{}. {} ({})", i + 1, details.title, details.price);
        println!("   {} · {} · {}", details.area, details.location, details.status);
        if let Some(summary) = &details.order_summary {
            println!("   {}", summary);
        }
        println!("   [{}]", details.order_button_text);
        println!();
    }

    if let Some(layer) = map.layer() {
        for (plot_id, err) in &layer.skipped {
            warn!("Plot {} not drawn: {}", plot_id, err);
        }

        let geojson = serde_json::to_string_pretty(&layer.to_feature_collection())?;
        tokio::fs::write("plot_layer.geojson", geojson).await?;
        info!(
            "💾 Saved {} features to plot_layer.geojson",
            layer.features.len()
        );
    }

    Ok(())
}
