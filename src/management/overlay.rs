//! Merging order state into plots, and the order affordances derived from it.

use std::collections::HashMap;

use crate::models::{EnrichedPlot, OrderStatus, OrderedPlot, Plot, PlotId, PlotStatus};

pub const ORDER_PENDING_TEXT: &str = "Order Pending";
pub const PLOT_TAKEN_TEXT: &str = "Plot Taken";
pub const REORDER_TEXT: &str = "Reorder Plot";
pub const ORDER_TEXT: &str = "Order This Plot";
pub const NOT_AVAILABLE_TEXT: &str = "Not Available";

/// Latest non-closed order per plot.
pub fn latest_orders(ordered: &[OrderedPlot]) -> HashMap<PlotId, &OrderedPlot> {
    let mut latest: HashMap<PlotId, &OrderedPlot> = HashMap::new();
    for order in ordered.iter().filter(|o| o.order_status != OrderStatus::Closed) {
        latest
            .entry(order.plot_id)
            .and_modify(|current| {
                if order.order_date > current.order_date {
                    *current = order;
                }
            })
            .or_insert(order);
    }
    latest
}

/// Overlay order state onto plots.
pub fn enrich(plots: Vec<Plot>, ordered: &[OrderedPlot]) -> Vec<EnrichedPlot> {
    let latest = latest_orders(ordered);

    plots
        .into_iter()
        .map(|mut plot| match latest.get(&plot.id) {
            Some(order) => {
                if let Some(status) = order.order_status.plot_status() {
                    plot.status = status;
                }
                EnrichedPlot {
                    plot,
                    has_active_order: true,
                    order_status: Some(order.order_status),
                    order_date: Some(order.order_date),
                    customer_name: Some(order.customer_name.clone()),
                }
            }
            None => EnrichedPlot::unordered(plot),
        })
        .collect()
}

/// Whether the plot can be ordered from the UI.
///
/// A rejected order frees the plot for a new one.
pub fn should_show_order_button(plot: &EnrichedPlot) -> bool {
    if plot.has_active_order && plot.order_status != Some(OrderStatus::Rejected) {
        return false;
    }
    plot.status() == PlotStatus::Available
}

pub fn order_button_text(plot: &EnrichedPlot) -> &'static str {
    if plot.has_active_order {
        match plot.order_status {
            Some(OrderStatus::Pending) => return ORDER_PENDING_TEXT,
            Some(OrderStatus::Approved) => return PLOT_TAKEN_TEXT,
            Some(OrderStatus::Rejected) => return REORDER_TEXT,
            Some(OrderStatus::Closed) | None => {}
        }
    }

    if plot.status() == PlotStatus::Available {
        ORDER_TEXT
    } else {
        NOT_AVAILABLE_TEXT
    }
}

/// One line describing the order against a plot, if there is one.
pub fn order_summary(plot: &EnrichedPlot) -> Option<String> {
    if !plot.has_active_order {
        return None;
    }

    let customer = plot.customer_name.as_deref().unwrap_or("a customer");
    let date = plot
        .order_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "an unknown date".to_string());

    match plot.order_status? {
        OrderStatus::Pending => Some(format!(
            "Order by {} on {} is awaiting review",
            customer, date
        )),
        OrderStatus::Approved => Some(format!("Taken by {} (approved {})", customer, date)),
        OrderStatus::Rejected => Some(format!(
            "Order by {} on {} was rejected; the plot can be ordered again",
            customer, date
        )),
        OrderStatus::Closed => None,
    }
}
