mod common;

use common::{ordered, plot, FakeApi};
use landhub::management::PlotManagementService;
use landhub::models::{OrderStatus, PlotStatus};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(30);

fn service(api: &Arc<FakeApi>) -> PlotManagementService {
    PlotManagementService::new(api.clone(), TTL)
}

fn slow_api() -> Arc<FakeApi> {
    let api = FakeApi::default().with_latency(Duration::from_millis(200));
    api.set_ordered(vec![ordered(1, OrderStatus::Pending)]);
    Arc::new(api)
}

#[tokio::test(start_paused = true)]
async fn concurrent_reads_share_one_request() {
    let api = slow_api();
    let service = service(&api);

    let (a, b) = tokio::join!(service.ordered_plots(), service.ordered_plots());

    assert_eq!(api.ordered_calls(), 1);
    assert_eq!(a, b);
    assert_eq!(a.len(), 1);

    tokio::time::advance(Duration::from_secs(10)).await;
    service.ordered_plots().await;
    assert_eq!(api.ordered_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_cache_refetches() {
    let api = slow_api();
    let service = service(&api);

    service.ordered_plots().await;
    tokio::time::advance(TTL + Duration::from_secs(1)).await;
    service.ordered_plots().await;

    assert_eq!(api.ordered_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn failure_serves_stale_listing() {
    let api = slow_api();
    let service = service(&api);

    let first = service.ordered_plots().await;
    api.ordered_fails.store(true, Ordering::SeqCst);
    tokio::time::advance(TTL * 2).await;

    let second = service.ordered_plots().await;
    assert_eq!(api.ordered_calls(), 2);
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn failure_without_cache_is_empty() {
    let api = slow_api();
    api.ordered_fails.store(true, Ordering::SeqCst);
    let service = service(&api);

    assert!(service.ordered_plots().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn invalidate_forces_refetch() {
    let api = slow_api();
    let service = service(&api);

    service.ordered_plots().await;
    service.invalidate_cache().await;
    api.set_ordered(vec![]);

    assert!(service.ordered_plots().await.is_empty());
    assert_eq!(api.ordered_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn fetch_detached_by_invalidation_is_not_cached() {
    let api = slow_api();
    let service = Arc::new(service(&api));

    let reader = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.ordered_plots().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    service.invalidate_cache().await;

    // The detached reader still gets its answer.
    assert_eq!(reader.await.unwrap().len(), 1);

    service.ordered_plots().await;
    assert_eq!(api.ordered_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn enrichment_uses_cached_orders() {
    let api = Arc::new(FakeApi::default());
    api.set_ordered(vec![
        ordered(1, OrderStatus::Approved),
        ordered(2, OrderStatus::Rejected),
        ordered(3, OrderStatus::Pending),
    ]);
    let service = service(&api);

    let plots = (1..=4).map(|id| plot(id, PlotStatus::Available)).collect();
    let enriched = service.enrich_plots_with_order_status(plots).await;

    let statuses: Vec<PlotStatus> = enriched.iter().map(|p| p.status()).collect();
    assert_eq!(
        statuses,
        vec![
            PlotStatus::Taken,
            PlotStatus::Available,
            PlotStatus::Pending,
            PlotStatus::Available
        ]
    );
    assert!(!enriched[3].has_active_order);
    assert_eq!(service.order_button_text(&enriched[1]), "Reorder Plot");
    assert!(service.should_show_order_button(&enriched[1]));
    assert!(!service.should_show_order_button(&enriched[0]));
    assert!(service.order_summary(&enriched[3]).is_none());
}

#[tokio::test(start_paused = true)]
async fn enrichment_degrades_when_orders_unavailable() {
    let api = Arc::new(FakeApi::default());
    api.set_ordered(vec![ordered(1, OrderStatus::Approved)]);
    api.ordered_fails.store(true, Ordering::SeqCst);
    let service = service(&api);

    let enriched = service
        .enrich_plots_with_order_status(vec![plot(1, PlotStatus::Available)])
        .await;

    assert!(!enriched[0].has_active_order);
    assert_eq!(enriched[0].status(), PlotStatus::Available);
}

#[tokio::test]
async fn direct_order_status_check() {
    let api = Arc::new(FakeApi::default());
    api.set_ordered(vec![ordered(5, OrderStatus::Pending)]);
    let service = service(&api);

    assert!(service.check_order_status(5).await);
    assert!(!service.check_order_status(6).await);
}
