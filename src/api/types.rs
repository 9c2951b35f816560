use serde::{Deserialize, Serialize};

use crate::models::{Plot, PlotStatus, PlotType};

/// Search filters for plot listings.
///
/// Sent as query parameters; `None` fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub plot_type: Option<PlotType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Minimum area in square meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,
    /// Maximum area in square meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_area: Option<f64>,
    /// Case-insensitive substring of the location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl PlotQuery {
    /// Apply the same filters locally.
    pub fn matches(&self, plot: &Plot) -> bool {
        let within = |value: f64, min: Option<f64>, max: Option<f64>| {
            min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
        };

        self.plot_type.map_or(true, |t| plot.plot_type == t)
            && self.status.map_or(true, |s| plot.status == s)
            && within(plot.price, self.min_price, self.max_price)
            && within(plot.area, self.min_area, self.max_area)
            && self.location.as_deref().map_or(true, |needle| {
                plot.location
                    .to_lowercase()
                    .contains(&needle.trim().to_lowercase())
            })
    }
}

/// Body of `GET /api/plots/{id}/order-status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub has_active_order: bool,
}

/// Which health endpoint to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthProbe {
    /// `GET /health`
    Liveness,
    /// `GET /health/db`
    Readiness,
}

impl HealthProbe {
    pub fn path(self) -> &'static str {
        match self {
            HealthProbe::Liveness => "/health",
            HealthProbe::Readiness => "/health/db",
        }
    }
}

/// Health endpoint body. Backends add their own fields, kept in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}
