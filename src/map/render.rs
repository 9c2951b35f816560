//! Turning enriched plots into a drawable layer.

use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::geometry::{self, Geometry, GeometryError, Position};
use crate::map::popup::popup_html;
use crate::map::style::{plot_style, PlotStyle, StyleInput};
use crate::models::{EnrichedPlot, PlotId};

/// Where the map opens on first load: Nairobi metropolitan area.
pub const DEFAULT_VIEW: Viewport = Viewport {
    center: [36.8219, -1.2921],
    zoom: 12.0,
};

/// Map center (`[lng, lat]`) and zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Position,
    pub zoom: f64,
}

/// One plot ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPlot {
    pub plot_id: PlotId,
    /// Normalized boundary. `None` for plots drawn as a point.
    pub geometry: Option<Geometry>,
    pub centroid: Position,
    pub style: PlotStyle,
    pub popup: String,
    pub label: String,
}

/// The vector layer for the current plot set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotLayer {
    pub features: Vec<RenderedPlot>,
    /// Plots left out because their geometry was rejected
    #[serde(skip)]
    pub skipped: Vec<(PlotId, GeometryError)>,
}

impl PlotLayer {
    pub fn get(&self, plot_id: PlotId) -> Option<&RenderedPlot> {
        self.features.iter().find(|f| f.plot_id == plot_id)
    }

    /// GeoJSON FeatureCollection with style and popup in the properties.
    pub fn to_feature_collection(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|feature| {
                let geometry = match &feature.geometry {
                    Some(geometry) => json!(geometry),
                    None => json!({ "type": "Point", "coordinates": feature.centroid }),
                };
                json!({
                    "type": "Feature",
                    "id": feature.plot_id,
                    "geometry": geometry,
                    "properties": {
                        "label": feature.label,
                        "centroid": feature.centroid,
                        "style": feature.style,
                        "popup": feature.popup,
                    }
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}

/// Stable digest of the plot data, used to skip rebuilds when nothing changed.
pub fn content_hash(plots: &[EnrichedPlot]) -> String {
    let mut hasher = Sha256::new();
    let json = serde_json::to_string(plots).unwrap_or_default();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Normalize, style and label one plot.
pub fn render_plot(
    enriched: &EnrichedPlot,
    hovered: bool,
    selected: bool,
) -> Result<RenderedPlot, GeometryError> {
    let plot = &enriched.plot;

    let (geometry, centroid) = match &plot.geometry {
        Some(raw) => {
            let normalized = geometry::normalize(raw)?;
            let centroid = geometry::centroid(&normalized).ok_or(GeometryError::Empty)?;
            (Some(normalized), centroid)
        }
        None => {
            let centroid = geometry::normalize_position([plot.longitude, plot.latitude]).ok_or(
                GeometryError::InvalidPosition {
                    ring: 0,
                    index: 0,
                    lng: plot.longitude,
                    lat: plot.latitude,
                },
            )?;
            (None, centroid)
        }
    };

    Ok(RenderedPlot {
        plot_id: plot.id,
        geometry,
        centroid,
        style: plot_style(StyleInput::for_plot(enriched, hovered, selected)),
        popup: popup_html(enriched),
        label: plot.title.clone(),
    })
}

/// Build the layer for a plot set. Invalid plots are skipped and reported.
pub fn build_layer(
    plots: &[EnrichedPlot],
    hovered: Option<PlotId>,
    selected: Option<PlotId>,
) -> PlotLayer {
    let mut layer = PlotLayer::default();

    for enriched in plots {
        let id = enriched.id();
        match render_plot(enriched, hovered == Some(id), selected == Some(id)) {
            Ok(feature) => layer.features.push(feature),
            Err(err) => {
                warn!("Skipping plot {}: {}", id, err);
                layer.skipped.push((id, err));
            }
        }
    }

    debug!(
        "Built layer with {} features ({} skipped)",
        layer.features.len(),
        layer.skipped.len()
    );
    layer
}

/// Recompute styles after a hover or selection change, without touching
/// geometry.
pub fn restyle(
    layer: &mut PlotLayer,
    plots: &[EnrichedPlot],
    hovered: Option<PlotId>,
    selected: Option<PlotId>,
) {
    for feature in &mut layer.features {
        if let Some(enriched) = plots.iter().find(|p| p.id() == feature.plot_id) {
            let id = feature.plot_id;
            feature.style = plot_style(StyleInput::for_plot(
                enriched,
                hovered == Some(id),
                selected == Some(id),
            ));
        }
    }
}
