//! Client core of the LandHub plot marketplace.
//!
//! - [`api`]: REST client for plots, orders and health endpoints
//! - [`management`]: order-status cache and overlay
//! - [`geometry`]: boundary validation, normalization and centroids
//! - [`map`]: the map view model, from styling to optimistic orders

pub mod api;
pub mod config;
pub mod error;
pub mod geometry;
pub mod health;
pub mod management;
pub mod map;
pub mod models;

pub use config::Config;
pub use error::{PlotError, PlotResult};
