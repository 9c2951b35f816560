use thiserror::Error;

use crate::models::PlotId;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Plot {0} not found")]
    PlotNotFound(PlotId),

    #[error("Plot {plot_id} cannot be ordered: {reason}")]
    NotOrderable { plot_id: PlotId, reason: String },

    #[error("Map cannot move from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Plot data failed to load after {attempts} attempts: {source}")]
    LoadExhausted {
        attempts: u32,
        #[source]
        source: Box<PlotError>,
    },
}

impl PlotError {
    /// True for 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlotError::Status { status: 404, .. })
    }
}
