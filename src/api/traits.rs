use crate::api::types::{HealthProbe, HealthReport, PlotQuery};
use crate::error::PlotResult;
use crate::models::{Order, OrderRequest, OrderedPlot, Plot, PlotId};
use async_trait::async_trait;

/// Remote plot backend.
///
/// [`crate::api::PlotService`] talks HTTP; tests substitute an in-memory
/// implementation.
#[async_trait]
pub trait PlotApi: Send + Sync {
    /// List plots matching the query
    async fn fetch_plots(&self, query: &PlotQuery) -> PlotResult<Vec<Plot>>;

    /// List plots that have orders against them
    async fn fetch_ordered_plots(&self) -> PlotResult<Vec<OrderedPlot>>;

    /// Whether a plot has an active order. Unknown plots report `false`.
    async fn fetch_order_status(&self, plot_id: PlotId) -> PlotResult<bool>;

    /// Create an order
    async fn submit_order(&self, request: &OrderRequest) -> PlotResult<Order>;

    /// Probe backend health
    async fn health(&self, probe: HealthProbe) -> PlotResult<HealthReport>;
}
