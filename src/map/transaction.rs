use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{PlotError, PlotResult};
use crate::management::should_show_order_button;
use crate::models::{EnrichedPlot, OrderRequest, OrderStatus, PlotId, PlotStatus};

/// An optimistic order applied to the local plot list.
///
/// Holds the list as it was before the change. [`commit`](Self::commit)
/// keeps the change; [`rollback`](Self::rollback) puts the snapshot back.
#[must_use = "an optimistic order must be committed or rolled back"]
#[derive(Debug)]
pub struct OrderTransaction {
    plot_id: PlotId,
    snapshot: Vec<EnrichedPlot>,
}

impl OrderTransaction {
    /// Snapshot `plots` and mark the requested plot as pending.
    pub fn begin(
        plots: &mut [EnrichedPlot],
        request: &OrderRequest,
        now: DateTime<Utc>,
    ) -> PlotResult<Self> {
        let snapshot = plots.to_vec();

        let plot = plots
            .iter_mut()
            .find(|p| p.id() == request.plot_id)
            .ok_or(PlotError::PlotNotFound(request.plot_id))?;

        if !should_show_order_button(plot) {
            return Err(PlotError::NotOrderable {
                plot_id: request.plot_id,
                reason: format!("status is {}", plot.status()),
            });
        }

        plot.plot.status = PlotStatus::Pending;
        plot.has_active_order = true;
        plot.order_status = Some(OrderStatus::Pending);
        plot.order_date = Some(now);
        plot.customer_name = Some(request.requester.name.clone());

        debug!("Optimistically marked plot {} pending", request.plot_id);
        Ok(Self {
            plot_id: request.plot_id,
            snapshot,
        })
    }

    pub fn commit(self) {
        debug!("Committed optimistic order for plot {}", self.plot_id);
    }

    pub fn rollback(self, plots: &mut Vec<EnrichedPlot>) {
        debug!("Rolling back optimistic order for plot {}", self.plot_id);
        *plots = self.snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Plot, PlotType, Requester};

    fn plots() -> Vec<EnrichedPlot> {
        [(1, PlotStatus::Available), (2, PlotStatus::Taken)]
            .into_iter()
            .map(|(id, status)| {
                EnrichedPlot::unordered(Plot {
                    id,
                    title: format!("Plot {}", id),
                    description: None,
                    price: 750_000.0,
                    area: 400.0,
                    location: "Syokimau".to_string(),
                    latitude: -1.36,
                    longitude: 36.93,
                    geometry: None,
                    status,
                    plot_type: PlotType::Commercial,
                    amenities: Default::default(),
                    utilities: Default::default(),
                    images: vec![],
                    owner: Default::default(),
                    created_at: Utc::now(),
                    updated_at: None,
                })
            })
            .collect()
    }

    fn request(plot_id: PlotId) -> OrderRequest {
        OrderRequest {
            plot_id,
            requester: Requester {
                name: "Akinyi".to_string(),
                email: "akinyi@example.com".to_string(),
                phone: None,
            },
            message: None,
            inspection_date: None,
            needs_financing: false,
        }
    }

    #[test]
    fn begin_applies_pending_state() {
        let mut list = plots();
        let tx = OrderTransaction::begin(&mut list, &request(1), Utc::now()).unwrap();
        assert_eq!(list[0].status(), PlotStatus::Pending);
        assert_eq!(list[0].order_status, Some(OrderStatus::Pending));
        assert_eq!(list[0].customer_name.as_deref(), Some("Akinyi"));
        tx.commit();
        assert!(list[0].has_active_order);
    }

    #[test]
    fn rollback_restores_snapshot() {
        let original = plots();
        let mut list = original.clone();
        let tx = OrderTransaction::begin(&mut list, &request(1), Utc::now()).unwrap();
        assert_ne!(list, original);
        tx.rollback(&mut list);
        assert_eq!(list, original);
    }

    #[test]
    fn unknown_or_unavailable_plots_are_refused() {
        let mut list = plots();
        let before = list.clone();
        assert!(matches!(
            OrderTransaction::begin(&mut list, &request(99), Utc::now()),
            Err(PlotError::PlotNotFound(99))
        ));
        assert!(matches!(
            OrderTransaction::begin(&mut list, &request(2), Utc::now()),
            Err(PlotError::NotOrderable { plot_id: 2, .. })
        ));
        assert_eq!(list, before);
    }
}
