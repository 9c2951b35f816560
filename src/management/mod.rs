//! Order-status overlay for plot listings.
//!
//! [`PlotManagementService`] owns the ordered-plot cache and answers the
//! questions the map asks about each plot: what status to show, whether to
//! offer an order button and what it should say.

pub mod cache;
pub mod overlay;

pub use cache::OrderStatusCache;
pub use overlay::{enrich, order_button_text, order_summary, should_show_order_button};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::PlotApi;
use crate::models::{EnrichedPlot, OrderedPlot, Plot, PlotId};

pub struct PlotManagementService {
    api: Arc<dyn PlotApi>,
    cache: OrderStatusCache,
}

impl PlotManagementService {
    pub fn new(api: Arc<dyn PlotApi>, cache_ttl: Duration) -> Self {
        Self {
            cache: OrderStatusCache::new(Arc::clone(&api), cache_ttl),
            api,
        }
    }

    /// Ordered plots through the cache. Never fails.
    pub async fn ordered_plots(&self) -> Vec<OrderedPlot> {
        self.cache.get().await.as_ref().clone()
    }

    /// Forget cached order state; call after anything that changes orders.
    pub async fn invalidate_cache(&self) {
        self.cache.invalidate().await;
    }

    /// Apply current order state to plots.
    pub async fn enrich_plots_with_order_status(&self, plots: Vec<Plot>) -> Vec<EnrichedPlot> {
        let ordered = self.cache.get().await;
        let enriched = enrich(plots, &ordered);
        debug!(
            "Enriched {} plots, {} with orders",
            enriched.len(),
            enriched.iter().filter(|p| p.has_active_order).count()
        );
        enriched
    }

    /// Ask the backend directly whether a plot has an active order.
    ///
    /// Bypasses the cache. Errors count as "not ordered".
    pub async fn check_order_status(&self, plot_id: PlotId) -> bool {
        match self.api.fetch_order_status(plot_id).await {
            Ok(has_order) => has_order,
            Err(err) => {
                warn!("Order status check for plot {} failed: {}", plot_id, err);
                false
            }
        }
    }

    pub fn should_show_order_button(&self, plot: &EnrichedPlot) -> bool {
        should_show_order_button(plot)
    }

    pub fn order_button_text(&self, plot: &EnrichedPlot) -> &'static str {
        order_button_text(plot)
    }

    pub fn order_summary(&self, plot: &EnrichedPlot) -> Option<String> {
        order_summary(plot)
    }
}
