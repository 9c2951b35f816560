use serde::Serialize;

use crate::geometry::Position;
use crate::map::render::PlotLayer;
use crate::models::PlotId;

/// A text label pinned at a plot's centroid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub plot_id: PlotId,
    pub position: Position,
    pub text: String,
}

/// Decides when labels show and splits the work into batches.
#[derive(Debug, Clone)]
pub struct LabelPlacer {
    min_zoom: f64,
    batch_size: usize,
}

impl LabelPlacer {
    pub fn new(min_zoom: f64, batch_size: usize) -> Self {
        Self {
            min_zoom,
            batch_size: batch_size.max(1),
        }
    }

    pub fn visible_at(&self, zoom: f64) -> bool {
        zoom >= self.min_zoom
    }

    /// Labels for every feature of the layer, grouped into batches.
    ///
    /// Empty below the minimum zoom.
    pub fn batches(&self, zoom: f64, layer: &PlotLayer) -> Vec<Vec<Label>> {
        if !self.visible_at(zoom) {
            return Vec::new();
        }

        layer
            .features
            .chunks(self.batch_size)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|feature| Label {
                        plot_id: feature.plot_id,
                        position: feature.centroid,
                        text: feature.label.clone(),
                    })
                    .collect()
            })
            .collect()
    }
}
