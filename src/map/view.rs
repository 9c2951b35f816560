//! The map view model.
//!
//! `MapView` owns everything the map shows: the enriched plot list, the
//! rendered layer, labels, viewport, hover and selection, the order dialog
//! and the error notification. It is driven through `&mut self`, so at most
//! one load or render runs at a time; `MapPhase` records which one.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::{PlotApi, PlotQuery};
use crate::config::MapConfig;
use crate::error::{PlotError, PlotResult};
use crate::management::{should_show_order_button, PlotManagementService};
use crate::map::debounce::{DebounceTicket, Debouncer};
use crate::map::labels::{Label, LabelPlacer};
use crate::map::popup::PlotDetails;
use crate::map::render::{build_layer, content_hash, restyle, PlotLayer, Viewport, DEFAULT_VIEW};
use crate::map::transaction::OrderTransaction;
use crate::models::{EnrichedPlot, Order, OrderRequest, PlotId};

/// Lifecycle of the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapPhase {
    /// Created, nothing loaded yet
    Idle,
    /// Fetching plots; `attempt` counts from 1
    Loading { attempt: u32 },
    /// Rebuilding the layer and labels
    Rendering,
    Ready,
    /// Loading gave up
    Failed { message: String },
}

impl MapPhase {
    pub fn name(&self) -> &'static str {
        match self {
            MapPhase::Idle => "idle",
            MapPhase::Loading { .. } => "loading",
            MapPhase::Rendering => "rendering",
            MapPhase::Ready => "ready",
            MapPhase::Failed { .. } => "failed",
        }
    }

    pub fn can_transition_to(&self, next: &MapPhase) -> bool {
        matches!(
            (self, next),
            (MapPhase::Idle, MapPhase::Loading { .. })
                | (MapPhase::Idle, MapPhase::Rendering)
                | (MapPhase::Loading { .. }, MapPhase::Loading { .. })
                | (MapPhase::Loading { .. }, MapPhase::Rendering)
                | (MapPhase::Loading { .. }, MapPhase::Ready)
                | (MapPhase::Loading { .. }, MapPhase::Failed { .. })
                | (MapPhase::Rendering, MapPhase::Ready)
                | (MapPhase::Rendering, MapPhase::Failed { .. })
                | (MapPhase::Ready, MapPhase::Loading { .. })
                | (MapPhase::Ready, MapPhase::Rendering)
                | (MapPhase::Ready, MapPhase::Ready)
                | (MapPhase::Failed { .. }, MapPhase::Loading { .. })
                | (MapPhase::Failed { .. }, MapPhase::Rendering)
                | (MapPhase::Failed { .. }, MapPhase::Ready)
        )
    }
}

/// Dismissible message shown over the map
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// Run the load again, keeping the viewport
    Retry,
    /// Start over as if the page had been reloaded
    Reload,
}

/// What the map shows instead of plots once loading has given up
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPanel {
    pub message: String,
    pub actions: [PanelAction; 2],
}

/// Result of pushing a plot set through the render pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    /// False when the content hash matched and the old layer was kept
    pub rebuilt: bool,
    pub first_load: bool,
    pub features: usize,
    pub skipped: usize,
}

pub struct MapView {
    api: Arc<dyn PlotApi>,
    management: Arc<PlotManagementService>,
    config: MapConfig,
    query: PlotQuery,
    phase: MapPhase,
    initialized: bool,
    plots: Vec<EnrichedPlot>,
    layer: Option<PlotLayer>,
    content_hash: Option<String>,
    viewport: Option<Viewport>,
    labels: Vec<Label>,
    placer: LabelPlacer,
    hovered: Option<PlotId>,
    selected: Option<PlotId>,
    order_dialog: Option<PlotId>,
    notification: Option<Notification>,
    hover_debouncer: Debouncer,
    zoom_debouncer: Debouncer,
}

impl MapView {
    pub fn new(
        api: Arc<dyn PlotApi>,
        management: Arc<PlotManagementService>,
        config: MapConfig,
    ) -> Self {
        Self {
            placer: LabelPlacer::new(config.label_min_zoom, config.label_batch_size),
            hover_debouncer: Debouncer::new(config.hover_debounce),
            zoom_debouncer: Debouncer::new(config.zoom_debounce),
            api,
            management,
            config,
            query: PlotQuery::default(),
            phase: MapPhase::Idle,
            initialized: false,
            plots: Vec::new(),
            layer: None,
            content_hash: None,
            viewport: None,
            labels: Vec::new(),
            hovered: None,
            selected: None,
            order_dialog: None,
            notification: None,
        }
    }

    /// Restrict the plots the view loads
    pub fn with_query(mut self, query: PlotQuery) -> Self {
        self.query = query;
        self
    }

    pub fn phase(&self) -> &MapPhase {
        &self.phase
    }

    pub fn plots(&self) -> &[EnrichedPlot] {
        &self.plots
    }

    pub fn layer(&self) -> Option<&PlotLayer> {
        self.layer.as_ref()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn selected(&self) -> Option<PlotId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<PlotId> {
        self.hovered
    }

    pub fn order_dialog(&self) -> Option<PlotId> {
        self.order_dialog
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    fn transition(&mut self, next: MapPhase) -> PlotResult<()> {
        if !self.phase.can_transition_to(&next) {
            return Err(PlotError::InvalidTransition {
                from: self.phase.name(),
                to: next.name(),
            });
        }
        debug!("Map phase {} -> {}", self.phase.name(), next.name());
        self.phase = next;
        Ok(())
    }

    /// Load plots the first time. Later calls are no-ops.
    pub async fn initialize(&mut self) -> PlotResult<()> {
        if self.initialized {
            debug!("Map already initialized");
            return Ok(());
        }
        self.initialized = true;
        info!("Initializing map");
        self.load().await.map(|_| ())
    }

    /// Fetch and render plots, retrying with linear backoff.
    pub async fn load(&mut self) -> PlotResult<RenderOutcome> {
        let attempts = self.config.load_attempts.max(1);
        let mut attempt = 1;

        loop {
            self.transition(MapPhase::Loading { attempt })?;

            match self.fetch_enriched().await {
                Ok(plots) => return self.set_plots(plots).await,
                Err(err) if attempt < attempts => {
                    let wait = retry_wait(self.config.load_backoff, attempt);
                    warn!(
                        "Plot load attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, attempts, err, wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!("Plot load failed after {} attempts: {}", attempts, err);
                    self.transition(MapPhase::Failed {
                        message: format!("Could not load plots: {}", err),
                    })?;
                    return Err(PlotError::LoadExhausted {
                        attempts,
                        source: Box::new(err),
                    });
                }
            }
        }
    }

    async fn fetch_enriched(&self) -> PlotResult<Vec<EnrichedPlot>> {
        let plots = self.api.fetch_plots(&self.query).await?;
        Ok(self.management.enrich_plots_with_order_status(plots).await)
    }

    /// Replace the plot set, rebuilding only if its content changed.
    pub async fn set_plots(&mut self, plots: Vec<EnrichedPlot>) -> PlotResult<RenderOutcome> {
        let hash = content_hash(&plots);
        self.plots = plots;

        if let Some(layer) = &self.layer {
            if self.content_hash.as_deref() == Some(hash.as_str()) {
                debug!("Plot data unchanged, keeping current layer");
                let outcome = RenderOutcome {
                    rebuilt: false,
                    first_load: false,
                    features: layer.features.len(),
                    skipped: layer.skipped.len(),
                };
                self.transition(MapPhase::Ready)?;
                return Ok(outcome);
            }
        }

        self.content_hash = Some(hash);
        self.render().await
    }

    /// Drop the current layer and rebuild it from `self.plots`.
    async fn render(&mut self) -> PlotResult<RenderOutcome> {
        self.transition(MapPhase::Rendering)?;
        self.layer = None;

        let known = |id: Option<PlotId>, plots: &[EnrichedPlot]| {
            id.filter(|id| plots.iter().any(|p| p.id() == *id))
        };
        self.hovered = known(self.hovered, &self.plots);
        self.selected = known(self.selected, &self.plots);
        self.order_dialog = known(self.order_dialog, &self.plots);

        let layer = build_layer(&self.plots, self.hovered, self.selected);
        let outcome = RenderOutcome {
            rebuilt: true,
            first_load: self.viewport.is_none(),
            features: layer.features.len(),
            skipped: layer.skipped.len(),
        };

        if outcome.first_load {
            self.viewport = Some(DEFAULT_VIEW);
        }
        self.layer = Some(layer);
        self.refresh_labels().await;

        self.transition(MapPhase::Ready)?;
        info!(
            "Rendered {} plots ({} skipped)",
            outcome.features, outcome.skipped
        );
        Ok(outcome)
    }

    async fn rebuild_after_change(&mut self) -> PlotResult<RenderOutcome> {
        self.content_hash = Some(content_hash(&self.plots));
        self.render().await
    }

    /// Recompute labels for the current zoom, one batch at a time.
    pub async fn refresh_labels(&mut self) {
        self.labels.clear();
        let zoom = self.viewport.unwrap_or(DEFAULT_VIEW).zoom;
        let batches = match &self.layer {
            Some(layer) => self.placer.batches(zoom, layer),
            None => return,
        };

        for batch in batches {
            self.labels.extend(batch);
            tokio::task::yield_now().await;
        }
        debug!("Placed {} labels at zoom {}", self.labels.len(), zoom);
    }

    /// Record a pan or zoom without touching labels.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Record the zoom level at the end of a zoom gesture.
    ///
    /// Labels should be refreshed only if the returned ticket settles.
    pub fn zoom_ended(&mut self, zoom: f64) -> DebounceTicket {
        self.viewport.get_or_insert(DEFAULT_VIEW).zoom = zoom;
        self.zoom_debouncer.schedule()
    }

    /// Start a hover debounce; apply with [`set_hovered`](Self::set_hovered)
    /// if the ticket settles.
    pub fn schedule_hover(&self) -> DebounceTicket {
        self.hover_debouncer.schedule()
    }

    pub fn set_hovered(&mut self, plot_id: Option<PlotId>) {
        self.hovered = plot_id;
        self.restyle();
    }

    pub fn select_plot(&mut self, plot_id: Option<PlotId>) {
        self.selected = plot_id;
        self.restyle();
    }

    fn restyle(&mut self) {
        if let Some(layer) = &mut self.layer {
            restyle(layer, &self.plots, self.hovered, self.selected);
        }
    }

    pub fn plot(&self, plot_id: PlotId) -> Option<&EnrichedPlot> {
        self.plots.iter().find(|p| p.id() == plot_id)
    }

    /// Detail view model for a plot
    pub fn details(&self, plot_id: PlotId) -> Option<PlotDetails> {
        self.plot(plot_id).map(PlotDetails::from_plot)
    }

    pub fn open_order_dialog(&mut self, plot_id: PlotId) -> PlotResult<()> {
        let plot = self
            .plot(plot_id)
            .ok_or(PlotError::PlotNotFound(plot_id))?;
        if !should_show_order_button(plot) {
            return Err(PlotError::NotOrderable {
                plot_id,
                reason: format!("status is {}", plot.status()),
            });
        }
        self.order_dialog = Some(plot_id);
        Ok(())
    }

    pub fn close_order_dialog(&mut self) {
        self.order_dialog = None;
    }

    /// Submit an order, showing it as pending before the backend answers.
    ///
    /// On failure the plot list is restored exactly, the cache is left alone
    /// and a notification is raised.
    pub async fn submit_order(&mut self, request: OrderRequest) -> PlotResult<Order> {
        self.notification = None;
        let tx = OrderTransaction::begin(&mut self.plots, &request, Utc::now())?;

        if let Err(err) = self.rebuild_after_change().await {
            tx.rollback(&mut self.plots);
            return Err(err);
        }

        match self.api.submit_order(&request).await {
            Ok(order) => {
                tx.commit();
                self.management.invalidate_cache().await;
                if self.order_dialog == Some(request.plot_id) {
                    self.order_dialog = None;
                }
                info!("Order {} placed for plot {}", order.id, order.plot_id);
                Ok(order)
            }
            Err(err) => {
                warn!("Order for plot {} failed: {}", request.plot_id, err);
                tx.rollback(&mut self.plots);
                self.rebuild_after_change().await?;
                self.notification = Some(Notification {
                    message: format!("Could not submit your order: {}", err),
                });
                Err(err)
            }
        }
    }

    /// The error panel, present only after loading gave up.
    pub fn error_panel(&self) -> Option<ErrorPanel> {
        match &self.phase {
            MapPhase::Failed { message } => Some(ErrorPanel {
                message: message.clone(),
                actions: [PanelAction::Retry, PanelAction::Reload],
            }),
            _ => None,
        }
    }

    pub async fn handle_panel_action(&mut self, action: PanelAction) -> PlotResult<()> {
        match action {
            PanelAction::Retry => self.retry().await.map(|_| ()),
            PanelAction::Reload => self.reload().await,
        }
    }

    /// Load again, keeping viewport and selection.
    pub async fn retry(&mut self) -> PlotResult<RenderOutcome> {
        self.notification = None;
        self.load().await
    }

    /// Throw away all state, including cached order status, and start over.
    pub async fn reload(&mut self) -> PlotResult<()> {
        info!("Reloading map");
        self.management.invalidate_cache().await;
        self.hover_debouncer.cancel();
        self.zoom_debouncer.cancel();

        self.phase = MapPhase::Idle;
        self.initialized = false;
        self.plots.clear();
        self.layer = None;
        self.content_hash = None;
        self.viewport = None;
        self.labels.clear();
        self.hovered = None;
        self.selected = None;
        self.order_dialog = None;
        self.notification = None;

        self.initialize().await
    }
}

/// Linear backoff: `attempt × unit`, saturating at `Duration::MAX`.
fn retry_wait(unit: Duration, attempt: u32) -> Duration {
    unit.checked_mul(attempt).unwrap_or(Duration::MAX)
}
