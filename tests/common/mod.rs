#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use landhub::api::{HealthProbe, HealthReport, PlotApi, PlotQuery};
use landhub::error::{PlotError, PlotResult};
use landhub::geometry::Geometry;
use landhub::models::{
    Order, OrderRequest, OrderStatus, OrderedPlot, Plot, PlotId, PlotStatus, PlotType, Requester,
};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory backend with failure switches and call counters
#[derive(Default)]
pub struct FakeApi {
    pub plots: Mutex<Vec<Plot>>,
    pub ordered: Mutex<Vec<OrderedPlot>>,
    pub latency: Duration,
    /// Number of upcoming `fetch_plots` calls that fail
    pub plot_failures: AtomicU32,
    pub ordered_fails: AtomicBool,
    pub order_fails: AtomicBool,
    pub unhealthy: AtomicBool,
    pub plot_calls: AtomicUsize,
    pub ordered_calls: AtomicUsize,
    pub order_calls: AtomicUsize,
    pub health_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_plots(plots: Vec<Plot>) -> Self {
        Self {
            plots: Mutex::new(plots),
            ..Default::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_ordered(&self, ordered: Vec<OrderedPlot>) {
        *self.ordered.lock().unwrap() = ordered;
    }

    pub fn ordered_calls(&self) -> usize {
        self.ordered_calls.load(Ordering::SeqCst)
    }

    pub fn plot_calls(&self) -> usize {
        self.plot_calls.load(Ordering::SeqCst)
    }

    fn failure(path: &str) -> PlotError {
        PlotError::Status {
            url: format!("http://fake{}", path),
            status: 500,
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl PlotApi for FakeApi {
    async fn fetch_plots(&self, query: &PlotQuery) -> PlotResult<Vec<Plot>> {
        self.plot_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;

        let pending_failures = self.plot_failures.load(Ordering::SeqCst);
        if pending_failures > 0 {
            self.plot_failures.store(pending_failures - 1, Ordering::SeqCst);
            return Err(Self::failure("/api/plots"));
        }

        let plots = self.plots.lock().unwrap();
        Ok(plots.iter().filter(|p| query.matches(p)).cloned().collect())
    }

    async fn fetch_ordered_plots(&self) -> PlotResult<Vec<OrderedPlot>> {
        self.ordered_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;

        if self.ordered_fails.load(Ordering::SeqCst) {
            return Err(Self::failure("/api/plots/ordered"));
        }
        Ok(self.ordered.lock().unwrap().clone())
    }

    async fn fetch_order_status(&self, plot_id: PlotId) -> PlotResult<bool> {
        Ok(self
            .ordered
            .lock()
            .unwrap()
            .iter()
            .any(|o| o.plot_id == plot_id && o.order_status != OrderStatus::Closed))
    }

    async fn submit_order(&self, request: &OrderRequest) -> PlotResult<Order> {
        let id = self.order_calls.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.delay().await;

        if self.order_fails.load(Ordering::SeqCst) {
            return Err(Self::failure("/api/orders"));
        }

        let created_at = Utc::now();
        self.ordered.lock().unwrap().push(OrderedPlot {
            plot_id: request.plot_id,
            customer_name: request.requester.name.clone(),
            order_status: OrderStatus::Pending,
            order_date: created_at,
        });

        Ok(Order {
            id,
            plot_id: request.plot_id,
            requester: request.requester.clone(),
            message: request.message.clone(),
            inspection_date: request.inspection_date,
            needs_financing: request.needs_financing,
            status: OrderStatus::Pending,
            created_at,
        })
    }

    async fn health(&self, probe: HealthProbe) -> PlotResult<HealthReport> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(Self::failure(probe.path()));
        }
        Ok(serde_json::from_str(r#"{"status":"healthy"}"#).unwrap())
    }
}

pub fn square_at(lng: f64, lat: f64) -> Geometry {
    let d = 0.001;
    Geometry::Polygon(vec![vec![
        [lng, lat],
        [lng + d, lat],
        [lng + d, lat + d],
        [lng, lat + d],
        [lng, lat],
    ]])
}

pub fn plot(id: PlotId, status: PlotStatus) -> Plot {
    let lng = 36.9 + id as f64 * 0.01;
    let lat = -1.3;
    Plot {
        id,
        title: format!("Plot {}", id),
        description: Some("Quarter acre, ready title".to_string()),
        price: 1_500_000.0,
        area: 1011.7,
        location: "Ruiru, Kiambu".to_string(),
        latitude: lat,
        longitude: lng,
        geometry: Some(square_at(lng, lat)),
        status,
        plot_type: PlotType::Residential,
        amenities: ["water".to_string(), "electricity".to_string()]
            .into_iter()
            .collect(),
        utilities: Default::default(),
        images: vec![],
        owner: Default::default(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub fn ordered(plot_id: PlotId, status: OrderStatus) -> OrderedPlot {
    OrderedPlot {
        plot_id,
        customer_name: "Mwangi".to_string(),
        order_status: status,
        order_date: Utc.with_ymd_and_hms(2025, 2, 14, 12, 0, 0).unwrap(),
    }
}

pub fn order_request(plot_id: PlotId) -> OrderRequest {
    OrderRequest {
        plot_id,
        requester: Requester {
            name: "Achieng".to_string(),
            email: "achieng@example.com".to_string(),
            phone: Some("+254711000000".to_string()),
        },
        message: Some("Interested, please call".to_string()),
        inspection_date: None,
        needs_financing: true,
    }
}
