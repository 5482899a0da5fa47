//! List controllers against the stub backend: pagination, filters and
//! refetch after writes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use backoffice_admin::AppState;
use backoffice_admin::controllers::{ListController, SearchMode};
use backoffice_admin::resources::{
    FaqsEndpoint, OrdersEndpoint, ProductsEndpoint, ReviewsEndpoint, SortOrder, UsersEndpoint,
};
use backoffice_admin::storage::MemoryStore;
use backoffice_core::{FaqId, OrderId, OrderStatus, ProductId, UserId};
use backoffice_integration_tests::{StubBackend, app, log_in};

async fn signed_in(backend: &Arc<StubBackend>) -> AppState {
    let state = app(backend, Arc::new(MemoryStore::default())).unwrap();
    log_in(&state).await.unwrap();
    state.ui().drain_toasts();
    backend.clear_log();
    state
}

#[tokio::test]
async fn test_deleted_faq_disappears_from_list() {
    let backend = StubBackend::new();
    let product = backend.add_product("Classic Tee", "T-shirts", 29.99);
    let keep = backend.add_faq(&product, "Is it cotton?", "Yes, 100% organic cotton.");
    let doomed = backend.add_faq(&product, "Does it shrink?", "Slightly, wash it cold.");
    let state = signed_in(&backend).await;

    let mut faqs = ListController::new(&state, FaqsEndpoint::new(ProductId::new(&product)));
    faqs.load().await.unwrap();
    assert_eq!(faqs.visible_items().len(), 2);

    faqs.delete(&FaqId::new(&doomed)).await.unwrap();

    let ids: Vec<&str> = faqs.visible_items().iter().map(|faq| faq.id.as_str()).collect();
    assert_eq!(ids, vec![keep.as_str()]);
    assert_eq!(backend.faq_ids(&product), vec![keep]);
    assert_eq!(
        state.ui().drain_toasts()[0].message,
        "FAQ deleted successfully"
    );
}

#[tokio::test]
async fn test_other_view_refetches_after_delete() {
    let backend = StubBackend::new();
    let product = backend.add_product("Classic Tee", "T-shirts", 29.99);
    let faq = backend.add_faq(&product, "Is it cotton?", "Yes, 100% organic cotton.");
    let state = signed_in(&backend).await;
    let endpoint = FaqsEndpoint::new(ProductId::new(&product));

    let mut table = ListController::new(&state, endpoint.clone());
    let mut detail = ListController::new(&state, endpoint);
    table.load().await.unwrap();
    detail.load().await.unwrap();
    assert_eq!(backend.request_count(), 1);

    table.delete(&FaqId::new(&faq)).await.unwrap();
    assert!(detail.is_stale());
    detail.sync().await.unwrap();

    assert!(detail.visible_items().is_empty());
}

#[tokio::test]
async fn test_deleting_last_row_on_last_page_reclamps() {
    let backend = StubBackend::new();
    for i in 0..20 {
        backend.add_user(&format!("Shopper {i}"), &format!("shopper{i}@example.com"));
    }
    let state = signed_in(&backend).await;
    // 21 users with the admin: page 2 holds exactly one row.
    let mut users = ListController::new(&state, UsersEndpoint);
    users.set_page(2).await.unwrap();
    assert_eq!(users.visible_items().len(), 1);
    assert_eq!(users.showing(), (21, 21, 21));
    let last = users.visible_items()[0].id.clone();

    users.delete(&last).await.unwrap();

    assert_eq!(users.current_page(), 1);
    assert_eq!(users.filter().page(), 1);
    assert_eq!(users.visible_items().len(), 20);
    assert_eq!(users.showing(), (1, 20, 20));
}

#[tokio::test]
async fn test_filter_change_returns_to_first_page() {
    let backend = StubBackend::new();
    for i in 0..25 {
        backend.add_user(&format!("Shopper {i}"), &format!("shopper{i}@example.com"));
    }
    let state = signed_in(&backend).await;
    let mut users = ListController::new(&state, UsersEndpoint);
    users.set_page(2).await.unwrap();

    users.set_search("shopper1").await.unwrap();

    assert_eq!(users.filter().page(), 1);
    // shopper1 and shopper10..=shopper19
    assert_eq!(users.showing(), (1, 11, 11));
    let query = backend.requests().pop().unwrap().url.query().unwrap().to_string();
    assert!(query.contains("page=1"));
    assert!(query.contains("search=shopper1"));

    users.set_filter("role", "admin").await.unwrap();
    users.set_search("").await.unwrap();
    assert_eq!(users.visible_items().len(), 1);
    assert_eq!(users.visible_items()[0].id, UserId::new("admin"));
}

#[tokio::test]
async fn test_sort_is_sent_to_server() {
    let backend = StubBackend::new();
    backend.add_product("Cheap Socks", "Socks", 5.0);
    backend.add_product("Fancy Coat", "Coats", 250.0);
    let state = signed_in(&backend).await;
    let mut products = ListController::new(&state, ProductsEndpoint);

    products.set_sort("price", SortOrder::Desc).await.unwrap();
    assert_eq!(products.visible_items()[0].name, "Fancy Coat");

    products.set_sort("price", SortOrder::Asc).await.unwrap();
    assert_eq!(products.visible_items()[0].name, "Cheap Socks");
}

#[tokio::test]
async fn test_current_page_only_search_misses_other_pages() {
    let backend = StubBackend::new();
    for i in 0..10 {
        backend.add_product(&format!("Plain Tee {i}"), "T-shirts", 20.0);
    }
    backend.add_product("Slim Jeans", "Jeans", 60.0);
    let state = signed_in(&backend).await;
    let mut products =
        ListController::new(&state, ProductsEndpoint).with_search_mode(SearchMode::CurrentPageOnly);

    products.load().await.unwrap();
    products.set_search("jeans").await.unwrap();

    // The jeans are on page 2; only page 1 is searched.
    assert!(products.visible_items().is_empty());
    assert_eq!(backend.request_count(), 1);

    products.set_search("tee 3").await.unwrap();
    assert_eq!(products.visible_items().len(), 1);
}

#[tokio::test]
async fn test_reviews_scoped_to_product() {
    let backend = StubBackend::new();
    let tee = backend.add_product("Classic Tee", "T-shirts", 29.99);
    let jeans = backend.add_product("Slim Jeans", "Jeans", 60.0);
    backend.add_review(&tee, 5, "Great fit");
    let doomed = backend.add_review(&tee, 1, "Shrank");
    backend.add_review(&jeans, 4, "Comfortable");
    let state = signed_in(&backend).await;

    let mut reviews = ListController::new(&state, ReviewsEndpoint::for_product(ProductId::new(&tee)));
    reviews.load().await.unwrap();
    assert_eq!(reviews.visible_items().len(), 2);

    reviews.delete(&backoffice_core::ReviewId::new(&doomed)).await.unwrap();
    assert_eq!(reviews.visible_items().len(), 1);
    assert_eq!(reviews.visible_items()[0].rating.get(), 5);
}

#[tokio::test]
async fn test_order_status_change_refreshes_orders() {
    let backend = StubBackend::new();
    let order = backend.add_order("shopper@example.com", 120.0);
    let state = signed_in(&backend).await;
    let mut orders = ListController::new(&state, OrdersEndpoint);
    orders.load().await.unwrap();

    orders
        .update_status(&OrderId::new(&order), OrderStatus::Shipped)
        .await
        .unwrap();

    assert_eq!(backend.order_status(&order).as_deref(), Some("shipped"));
    assert_eq!(orders.visible_items()[0].status, OrderStatus::Shipped);
    assert_eq!(state.ui().drain_toasts()[0].message, "Status updated");
}

#[tokio::test]
async fn test_analytics_reads_are_cached() {
    let backend = StubBackend::new();
    backend.add_order("shopper@example.com", 120.0);
    let state = signed_in(&backend).await;

    let revenue = state.api().monthly_revenue(Some(6)).await.unwrap();
    assert_eq!(revenue.len(), 6);
    state.api().monthly_revenue(Some(6)).await.unwrap();
    let metrics = state.api().business_metrics().await.unwrap();
    assert_eq!(metrics.total_orders, 1);
    let categories = state.api().sales_by_category().await.unwrap();
    assert_eq!(categories.len(), 2);

    assert_eq!(backend.request_count(), 3);
}
