//! Popup markup and the plot detail view model.

use serde::Serialize;

use crate::management::{order_button_text, order_summary, should_show_order_button};
use crate::models::{EnrichedPlot, OwnerContact, PlotId};

/// What the detail modal shows for a plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotDetails {
    pub id: PlotId,
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub area: String,
    pub location: String,
    pub status: String,
    pub plot_type: String,
    pub amenities: Vec<String>,
    pub utilities: Vec<String>,
    pub images: Vec<String>,
    pub owner: OwnerContact,
    pub order_summary: Option<String>,
    pub show_order_button: bool,
    pub order_button_text: &'static str,
}

impl PlotDetails {
    pub fn from_plot(enriched: &EnrichedPlot) -> Self {
        let plot = &enriched.plot;
        Self {
            id: plot.id,
            title: plot.title.clone(),
            description: plot.description.clone(),
            price: format_price(plot.price),
            area: format_area(plot.area),
            location: plot.location.clone(),
            status: plot.status.to_string(),
            plot_type: format!("{:?}", plot.plot_type),
            amenities: plot.amenities.iter().cloned().collect(),
            utilities: plot.utilities.iter().cloned().collect(),
            images: plot.images.clone(),
            owner: plot.owner.clone(),
            order_summary: order_summary(enriched),
            show_order_button: should_show_order_button(enriched),
            order_button_text: order_button_text(enriched),
        }
    }
}

/// Whole currency units with thousands separators, e.g. `KES 1,250,000`.
pub fn format_price(price: f64) -> String {
    format!("KES {}", group_thousands(price.round().max(0.0) as u64))
}

/// Square meters, with acres once the plot passes a quarter acre.
pub fn format_area(area: f64) -> String {
    const SQ_M_PER_ACRE: f64 = 4046.856;
    let sq_m = format!("{} m²", group_thousands(area.round().max(0.0) as u64));
    if area >= SQ_M_PER_ACRE / 4.0 {
        format!("{} ({:.2} acres)", sq_m, area / SQ_M_PER_ACRE)
    } else {
        sq_m
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML bound to a plot polygon's popup.
pub fn popup_html(enriched: &EnrichedPlot) -> String {
    let details = PlotDetails::from_plot(enriched);

    let mut html = format!(
        "<div class=\"plot-popup\" data-plot-id=\"{}\"><h3>{}</h3>\
         <p>{} &middot; {}</p><p>{}</p><p class=\"status status-{}\">{}</p>",
        details.id,
        escape_html(&details.title),
        escape_html(&details.price),
        escape_html(&details.area),
        escape_html(&details.location),
        details.status,
        details.status,
    );

    if let Some(summary) = &details.order_summary {
        html.push_str(&format!("<p class=\"order-summary\">{}</p>", escape_html(summary)));
    }

    if details.show_order_button {
        html.push_str(&format!(
            "<button class=\"order-button\" data-plot-id=\"{}\">{}</button>",
            details.id, details.order_button_text
        ));
    } else {
        html.push_str(&format!(
            "<button class=\"order-button\" disabled>{}</button>",
            details.order_button_text
        ));
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, Plot, PlotStatus, PlotType};
    use chrono::Utc;

    fn enriched(title: &str) -> EnrichedPlot {
        EnrichedPlot::unordered(Plot {
            id: 12,
            title: title.to_string(),
            description: None,
            price: 1_250_000.0,
            area: 2023.4,
            location: "Ngong".to_string(),
            latitude: -1.36,
            longitude: 36.65,
            geometry: None,
            status: PlotStatus::Available,
            plot_type: PlotType::Residential,
            amenities: ["water".to_string()].into_iter().collect(),
            utilities: Default::default(),
            images: vec!["https://img.test/12.jpg".to_string()],
            owner: Default::default(),
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    #[test]
    fn price_and_area_formatting() {
        assert_eq!(format_price(1_250_000.0), "KES 1,250,000");
        assert_eq!(format_price(999.0), "KES 999");
        assert_eq!(format_area(450.0), "450 m²");
        assert_eq!(format_area(2023.4), "2,023 m² (0.50 acres)");
    }

    #[test]
    fn popup_escapes_and_offers_order() {
        let html = popup_html(&enriched("Plot <A> & B"));
        assert!(html.contains("Plot &lt;A&gt; &amp; B"));
        assert!(html.contains("Order This Plot"));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn popup_for_pending_order_disables_button() {
        let mut plot = enriched("Corner plot");
        plot.plot.status = PlotStatus::Pending;
        plot.has_active_order = true;
        plot.order_status = Some(OrderStatus::Pending);
        plot.customer_name = Some("Otieno".to_string());
        plot.order_date = Some(Utc::now());

        let html = popup_html(&plot);
        assert!(html.contains("Order Pending"));
        assert!(html.contains("disabled"));
        assert!(html.contains("Otieno"));
    }

    #[test]
    fn details_carry_lists() {
        let details = PlotDetails::from_plot(&enriched("Ngong view"));
        assert_eq!(details.amenities, vec!["water".to_string()]);
        assert_eq!(details.images.len(), 1);
        assert!(details.show_order_button);
        assert_eq!(details.plot_type, "Residential");
    }
}
