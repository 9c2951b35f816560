use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::geometry::Geometry;

pub type PlotId = i64;
pub type OrderId = i64;

/// Listing status of a plot.
///
/// `sold` from older datasets is read as `Taken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStatus {
    Available,
    Pending,
    Reserved,
    #[serde(alias = "sold")]
    Taken,
}

impl PlotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlotStatus::Available => "available",
            PlotStatus::Pending => "pending",
            PlotStatus::Reserved => "reserved",
            PlotStatus::Taken => "taken",
        }
    }
}

impl fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zoning of a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    Residential,
    Commercial,
    Agricultural,
    Industrial,
}

/// Contact details of the listing owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerContact {
    #[serde(rename = "owner_name")]
    pub name: Option<String>,
    #[serde(rename = "owner_phone")]
    pub phone: Option<String>,
    #[serde(rename = "owner_email")]
    pub email: Option<String>,
}

/// Core plot listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: PlotId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    /// Area in square meters
    pub area: f64,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    pub status: PlotStatus,
    #[serde(rename = "type")]
    pub plot_type: PlotType,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub utilities: BTreeSet<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub owner: OwnerContact,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a buyer inquiry.
///
/// `contacted` and `viewed` are older names for `Approved` and `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    #[serde(alias = "contacted")]
    Approved,
    #[serde(alias = "viewed")]
    Rejected,
    Closed,
}

impl OrderStatus {
    /// The plot status an order in this state implies, if any.
    pub fn plot_status(self) -> Option<PlotStatus> {
        match self {
            OrderStatus::Pending => Some(PlotStatus::Pending),
            OrderStatus::Approved => Some(PlotStatus::Taken),
            OrderStatus::Rejected => Some(PlotStatus::Available),
            OrderStatus::Closed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the ordered-plots listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedPlot {
    pub plot_id: PlotId,
    pub customer_name: String,
    pub order_status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

/// Who is asking about a plot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requester {
    #[serde(rename = "customer_name")]
    pub name: String,
    #[serde(rename = "customer_email")]
    pub email: String,
    #[serde(rename = "customer_phone", default)]
    pub phone: Option<String>,
}

/// Public inquiry form payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub plot_id: PlotId,
    #[serde(flatten)]
    pub requester: Requester,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub inspection_date: Option<NaiveDate>,
    #[serde(default)]
    pub needs_financing: bool,
}

/// An order as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub plot_id: PlotId,
    #[serde(flatten)]
    pub requester: Requester,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub inspection_date: Option<NaiveDate>,
    #[serde(default)]
    pub needs_financing: bool,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A plot with the order-status overlay applied.
///
/// `plot.status` already reflects the order when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPlot {
    #[serde(flatten)]
    pub plot: Plot,
    pub has_active_order: bool,
    pub order_status: Option<OrderStatus>,
    pub order_date: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
}

impl EnrichedPlot {
    /// Wrap a plot with no order attached.
    pub fn unordered(plot: Plot) -> Self {
        Self {
            plot,
            has_active_order: false,
            order_status: None,
            order_date: None,
            customer_name: None,
        }
    }

    pub fn id(&self) -> PlotId {
        self.plot.id
    }

    pub fn status(&self) -> PlotStatus {
        self.plot.status
    }
}
