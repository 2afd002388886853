//! Data-fetch resources against the fake API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use seller_console_client::resource::{DashboardFetch, OrderFetch, OrdersFetch, ProfileFetch};
use seller_console_client::{Resource, ResponseCache};
use seller_console_core::{
    AnalyticsFilters, Kopecks, OrderId, OrderStatus, OrdersFilters, StatsPeriod,
    UpdateOrderStatus,
};
use seller_console_integration_tests::{FakeApi, Harness};

// =============================================================================
// Dashboard Cache
// =============================================================================

#[tokio::test]
async fn test_dashboard_cache_shared_between_mounts() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);
    let cache = ResponseCache::new(Duration::from_secs(300));
    let filters = AnalyticsFilters::for_period(StatsPeriod::Week);

    let (first, handle) =
        Resource::mount_cached(DashboardFetch(harness.api.clone()), filters.clone(), cache.clone());
    handle.settled().await;
    let (second, handle) =
        Resource::mount_cached(DashboardFetch(harness.api.clone()), filters, cache);
    handle.settled().await;

    assert_eq!(server.dashboard_hits(), 1);
    assert_eq!(first.snapshot().data, second.snapshot().data);
    assert!(!second.snapshot().is_loading);
}

#[tokio::test]
async fn test_dashboard_different_filters_miss_cache() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);

    let (resource, handle) = Resource::mount_cached(
        DashboardFetch(harness.api.clone()),
        AnalyticsFilters::for_period(StatsPeriod::Week),
        ResponseCache::default(),
    );
    handle.settled().await;
    resource
        .set_filters(AnalyticsFilters::for_period(StatsPeriod::Month))
        .settled()
        .await;

    assert_eq!(server.dashboard_hits(), 2);
    let stats = resource.snapshot().data.unwrap();
    assert!((stats.revenue.current - 2000.0).abs() < f64::EPSILON);
    assert_eq!(stats.peak_hour().unwrap().hour, 14);
}

#[tokio::test]
async fn test_dashboard_refetch_bypasses_cache() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);
    let filters = AnalyticsFilters::for_period(StatsPeriod::Today);

    let (resource, handle) = Resource::mount_cached(
        DashboardFetch(harness.api.clone()),
        filters.clone(),
        ResponseCache::default(),
    );
    handle.settled().await;
    resource.refetch(filters).settled().await;

    assert_eq!(server.dashboard_hits(), 2);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_status_update_patches_loaded_list() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);

    let (orders, handle) =
        Resource::mount(OrdersFetch(harness.api.clone()), OrdersFilters::default());
    handle.settled().await;

    let id = OrderId::new("o-1");
    orders
        .update_status(&id, &UpdateOrderStatus::to(OrderStatus::InTransit))
        .await
        .unwrap();

    let page = orders.snapshot().data.unwrap();
    let patched = page.orders.iter().find(|o| o.id == id).unwrap();
    assert_eq!(patched.status, OrderStatus::InTransit);
    assert!(patched.updated_date.is_some());
    assert_eq!(page.orders[1].status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_missing_order_sets_error_without_data() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);

    let (order, handle) =
        Resource::mount(OrderFetch(harness.api.clone()), OrderId::new("missing"));
    handle.settled().await;

    let state = order.snapshot();
    assert!(state.data.is_none());
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Failed to load order details"));
}

#[tokio::test]
async fn test_profile_resource_loads() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);

    let (profile, handle) = Resource::mount(ProfileFetch(harness.api.clone()), ());
    handle.settled().await;

    let profile = profile.snapshot().data.unwrap();
    assert_eq!(profile.balance_kopecks, Kopecks::new(150_000));
    assert_eq!(profile.email.as_str(), "seller@example.com");
}
