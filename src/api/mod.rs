pub mod http;
pub mod traits;
pub mod types;

pub use http::PlotService;
pub use traits::PlotApi;
pub use types::{HealthProbe, HealthReport, OrderStatusResponse, PlotQuery};
