use crate::api::traits::PlotApi;
use crate::api::types::{HealthProbe, HealthReport, OrderStatusResponse, PlotQuery};
use crate::config::Config;
use crate::error::{PlotError, PlotResult};
use crate::models::{Order, OrderRequest, OrderedPlot, Plot, PlotId};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// REST client for the plot backend
pub struct PlotService {
    client: Client,
    base_url: String,
}

impl PlotService {
    /// Create a client from configuration
    pub fn new(config: &Config) -> PlotResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|source| PlotError::Transport {
                url: config.api_base_url.clone(),
                source,
            })?;

        Ok(Self::with_client(client, &config.api_base_url))
    }

    /// Use an existing client, e.g. one shared with other services
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and insist on a 2xx status
    async fn send(&self, url: &str, request: RequestBuilder) -> PlotResult<Response> {
        debug!("Requesting {}", url);

        let response = request.send().await.map_err(|source| PlotError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            return Err(PlotError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PlotResult<T> {
        let url = self.url(path);
        let response = self.send(&url, self.client.get(&url)).await?;
        decode(&url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> PlotResult<T> {
    response.json().await.map_err(|source| PlotError::Decode {
        url: url.to_string(),
        source,
    })
}

#[async_trait]
impl PlotApi for PlotService {
    async fn fetch_plots(&self, query: &PlotQuery) -> PlotResult<Vec<Plot>> {
        let url = self.url("/api/plots");
        let response = self.send(&url, self.client.get(&url).query(query)).await?;
        let plots: Vec<Plot> = decode(&url, response).await?;

        info!("Fetched {} plots", plots.len());
        Ok(plots)
    }

    async fn fetch_ordered_plots(&self) -> PlotResult<Vec<OrderedPlot>> {
        let ordered: Vec<OrderedPlot> = self.get_json("/api/plots/ordered").await?;
        debug!("Fetched {} ordered plots", ordered.len());
        Ok(ordered)
    }

    async fn fetch_order_status(&self, plot_id: PlotId) -> PlotResult<bool> {
        match self
            .get_json::<OrderStatusResponse>(&format!("/api/plots/{}/order-status", plot_id))
            .await
        {
            Ok(status) => Ok(status.has_active_order),
            Err(err) if err.is_not_found() => {
                debug!("Plot {} has no order record", plot_id);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    async fn submit_order(&self, request: &OrderRequest) -> PlotResult<Order> {
        let url = self.url("/api/orders");
        info!("Submitting order for plot {}", request.plot_id);

        let response = self.send(&url, self.client.post(&url).json(request)).await?;
        let order: Order = decode(&url, response).await?;

        info!("Created order {} for plot {}", order.id, order.plot_id);
        Ok(order)
    }

    async fn health(&self, probe: HealthProbe) -> PlotResult<HealthReport> {
        self.get_json(probe.path()).await
    }
}
