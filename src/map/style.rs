use serde::Serialize;

use crate::models::{EnrichedPlot, OrderStatus, PlotStatus};

pub const AVAILABLE_COLOR: &str = "#22c55e";
pub const PENDING_COLOR: &str = "#f59e0b";
pub const RESERVED_COLOR: &str = "#3b82f6";
pub const TAKEN_COLOR: &str = "#6b7280";
/// Plots with an order awaiting review
pub const ORDER_PENDING_COLOR: &str = "#f97316";
/// Plots with an approved order
pub const ORDER_APPROVED_COLOR: &str = "#dc2626";
pub const SELECTED_COLOR: &str = "#2563eb";

const PENDING_DASH: &str = "6, 4";

/// Leaflet path options for one plot polygon
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<&'static str>,
}

/// Everything the style depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleInput {
    pub status: PlotStatus,
    pub has_active_order: bool,
    pub order_status: Option<OrderStatus>,
    pub hovered: bool,
    pub selected: bool,
}

impl StyleInput {
    pub fn for_plot(plot: &EnrichedPlot, hovered: bool, selected: bool) -> Self {
        Self {
            status: plot.status(),
            has_active_order: plot.has_active_order,
            order_status: plot.order_status,
            hovered,
            selected,
        }
    }
}

fn status_color(status: PlotStatus) -> &'static str {
    match status {
        PlotStatus::Available => AVAILABLE_COLOR,
        PlotStatus::Pending => PENDING_COLOR,
        PlotStatus::Reserved => RESERVED_COLOR,
        PlotStatus::Taken => TAKEN_COLOR,
    }
}

pub fn plot_style(input: StyleInput) -> PlotStyle {
    let order = if input.has_active_order {
        input.order_status
    } else {
        None
    };

    let (color, dash_array) = match order {
        Some(OrderStatus::Pending) => (ORDER_PENDING_COLOR, Some(PENDING_DASH)),
        Some(OrderStatus::Approved) => (ORDER_APPROVED_COLOR, None),
        Some(OrderStatus::Rejected) => (AVAILABLE_COLOR, None),
        Some(OrderStatus::Closed) | None => (status_color(input.status), None),
    };

    let mut style = PlotStyle {
        fill_color: color,
        color,
        weight: 2.0,
        opacity: 0.8,
        fill_opacity: 0.35,
        dash_array,
    };

    if input.hovered {
        style.weight = 3.0;
        style.opacity = 1.0;
        style.fill_opacity = 0.55;
    }

    if input.selected {
        style.color = SELECTED_COLOR;
        style.fill_color = SELECTED_COLOR;
        style.weight = 4.0;
        style.opacity = 1.0;
        style.fill_opacity = 0.5;
    }

    style
}
