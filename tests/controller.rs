//! End-to-end behaviour of the properties controller against in-memory sources.

use chrono::Utc;
use listing_store::sources::{sample_properties, MemorySource};
use listing_store::{
    ControllerOptions, ManualClock, PropertiesController, Property, PropertyFilters,
};
use std::sync::Arc;
use std::time::Duration;

fn listing(id: &str, price: f64, city: &str) -> Property {
    Property::new(id, format!("Listing {id}"), price, city, "apartment")
}

fn options() -> ControllerOptions {
    ControllerOptions {
        items_per_page: 2,
        cache_expiry: Duration::from_secs(60),
        filter_debounce: Duration::from_millis(20),
        filter_delay: Duration::from_millis(20),
        ..ControllerOptions::default()
    }
}

fn controller(source: Arc<MemorySource>) -> (PropertiesController, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let controller = PropertiesController::with_clock(source, options(), clock.clone());
    (controller, clock)
}

fn ids(properties: &[Property]) -> Vec<&str> {
    properties.iter().map(|p| p.id.as_str()).collect()
}

fn three_listings() -> Vec<Property> {
    vec![
        listing("a", 100_000.0, "Paris"),
        listing("b", 300_000.0, "Nice"),
        listing("c", 2_000_000.0, "Paris"),
    ]
}

#[tokio::test]
async fn start_fetches_first_page() {
    let source = Arc::new(MemorySource::new(three_listings()).with_count(30));
    let (controller, _) = controller(source.clone());

    controller.start().await;

    let state = controller.snapshot().await;
    assert_eq!(ids(&state.filtered_properties), vec!["a", "b"]);
    assert_eq!(state.all_properties_count, 30);
    assert!(state.has_more);
    assert!(!state.loading);
    assert!(controller.is_cache_valid().await);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn start_without_auto_fetch_does_nothing() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let options = ControllerOptions {
        auto_fetch: false,
        ..options()
    };
    let controller = PropertiesController::with_clock(source.clone(), options, clock);

    controller.start().await;

    assert_eq!(source.calls(), 0);
    assert!(controller.snapshot().await.properties.is_empty());
}

#[tokio::test]
async fn fresh_cache_skips_fetch_until_expiry() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, clock) = controller(source.clone());

    controller.fetch_properties().await;
    controller.fetch_properties().await;
    assert_eq!(source.calls(), 1);

    clock.advance(Duration::from_secs(59));
    controller.fetch_properties().await;
    assert_eq!(source.calls(), 1);

    clock.advance(Duration::from_secs(2));
    assert!(!controller.is_cache_valid().await);
    controller.fetch_properties().await;
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn cache_is_stale_at_exactly_the_expiry() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, clock) = controller(source.clone());
    controller.fetch_properties().await;

    clock.advance(Duration::from_secs(60));

    assert!(!controller.is_cache_valid().await);
    controller.fetch_properties().await;
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn fresh_cache_with_no_records_still_fetches() {
    let source = Arc::new(MemorySource::new(Vec::new()));
    let (controller, _) = controller(source.clone());

    controller.fetch_properties().await;
    controller.fetch_properties().await;

    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn refresh_ignores_fresh_cache() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source.clone());
    controller.fetch_properties().await;

    source.set_records(vec![listing("z", 1.0, "Rome")]);
    controller.refresh().await;

    assert_eq!(source.calls(), 2);
    assert_eq!(ids(&controller.visible_properties().await), vec!["z"]);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_records() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source.clone());
    controller.fetch_properties().await;

    source.set_failure(Some("backend unavailable"));
    controller.refresh().await;

    let state = controller.snapshot().await;
    assert_eq!(state.error.as_deref(), Some("backend unavailable"));
    assert!(!state.loading);
    assert_eq!(state.properties.len(), 3);
    assert_eq!(ids(&state.filtered_properties), vec!["a", "b"]);

    controller.clear_error().await;
    assert!(controller.snapshot().await.error.is_none());
}

#[tokio::test]
async fn empty_error_message_uses_fallback() {
    let source = Arc::new(MemorySource::new(three_listings()));
    source.set_failure(Some(""));
    let (controller, _) = controller(source);

    controller.fetch_properties().await;

    assert_eq!(
        controller.snapshot().await.error.as_deref(),
        Some("Failed to fetch properties")
    );
}

#[tokio::test]
async fn concurrent_fetches_hit_source_once() {
    let source = Arc::new(
        MemorySource::new(three_listings()).with_latency(Duration::from_millis(50)),
    );
    let (controller, _) = controller(source.clone());

    tokio::join!(controller.fetch_properties(), controller.fetch_properties());

    assert_eq!(source.calls(), 1);
    assert_eq!(controller.snapshot().await.properties.len(), 3);
}

#[tokio::test]
async fn refresh_supersedes_fetch_in_flight() {
    let source = Arc::new(
        MemorySource::new(three_listings()).with_latency(Duration::from_millis(50)),
    );
    let (controller, _) = controller(source.clone());

    tokio::join!(controller.fetch_properties(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        source.set_failure(Some("down"));
        controller.refresh().await;
    });

    let state = controller.snapshot().await;
    assert_eq!(source.calls(), 2);
    assert!(state.properties.is_empty(), "older result must not land");
    assert_eq!(state.error.as_deref(), Some("down"));
    assert!(!state.loading);
}

#[tokio::test]
async fn reset_discards_fetch_in_flight() {
    let source = Arc::new(
        MemorySource::new(three_listings()).with_latency(Duration::from_millis(50)),
    );
    let (controller, _) = controller(source.clone());

    tokio::join!(controller.fetch_properties(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.reset().await;
    });

    let state = controller.snapshot().await;
    assert!(state.properties.is_empty());
    assert!(!state.loading);
    assert!(state.last_fetch_time.is_none());
}

#[tokio::test]
async fn close_drops_late_results_and_blocks_fetches() {
    let source = Arc::new(
        MemorySource::new(three_listings()).with_latency(Duration::from_millis(30)),
    );
    let (controller, _) = controller(source.clone());

    tokio::join!(controller.fetch_properties(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        controller.close();
    });
    controller.fetch_properties().await;

    assert_eq!(source.calls(), 1);
    assert!(controller.snapshot().await.properties.is_empty());
}

#[tokio::test]
async fn set_filters_applies_after_delay() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    controller.fetch_properties().await;
    controller.set_page(2).await;

    controller
        .set_filters(PropertyFilters::default().with_price_range(100_000.0, 400_000.0))
        .await;

    let pending = controller.snapshot().await;
    assert!(pending.filters_pending);
    assert_eq!(pending.current_page, 1);
    assert_eq!(ids(&pending.filtered_properties), vec!["c"], "stale page 2");

    controller.settle().await;

    let applied = controller.snapshot().await;
    assert!(!applied.filters_pending);
    assert!(!applied.filtering);
    assert_eq!(ids(&applied.filtered_properties), vec!["a", "b"]);
    assert_eq!(applied.filtered_count, 2);
}

#[tokio::test]
async fn filtering_flag_is_visible_between_phases() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let options = ControllerOptions {
        filter_debounce: Duration::ZERO,
        filter_delay: Duration::from_millis(200),
        ..options()
    };
    let controller = PropertiesController::with_clock(source, options, clock);
    controller.fetch_properties().await;

    controller
        .set_filters(PropertyFilters::default().with_cities(["Nice"]))
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(controller.snapshot().await.filtering);

    controller.settle().await;
    let state = controller.snapshot().await;
    assert!(!state.filtering);
    assert_eq!(ids(&state.filtered_properties), vec!["b"]);
}

#[tokio::test]
async fn newer_filters_win() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    controller.fetch_properties().await;

    controller
        .set_filters(PropertyFilters::default().with_cities(["Nice"]))
        .await;
    controller
        .set_filters(PropertyFilters::default().with_cities(["Paris"]))
        .await;
    controller.settle().await;

    let state = controller.snapshot().await;
    assert_eq!(ids(&state.filtered_properties), vec!["a", "c"]);
    assert!(!state.filters_pending);
}

#[tokio::test]
async fn concurrent_set_filters_settle_on_the_last_change() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    controller.fetch_properties().await;

    for _ in 0..20 {
        tokio::join!(
            controller.set_filters(PropertyFilters::default().with_cities(["Nice"])),
            controller.set_filters(PropertyFilters::default().with_cities(["Paris"])),
        );
        controller.settle().await;

        let state = controller.snapshot().await;
        assert!(!state.filters_pending, "settle must wait for the newest apply");
        assert!(!state.filtering);
        let expected = match state.filters.location.as_slice() {
            [city] if city == "Nice" => vec!["b"],
            _ => vec!["a", "c"],
        };
        assert_eq!(ids(&state.filtered_properties), expected);
    }
}

#[tokio::test]
async fn concurrent_set_filters_from_tasks_settle() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    let controller = Arc::new(controller);
    controller.fetch_properties().await;

    let handles: Vec<_> = ["Nice", "Paris", "Nice", "Paris"]
        .into_iter()
        .map(|city| {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller
                    .set_filters(PropertyFilters::default().with_cities([city]))
                    .await;
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }
    controller.settle().await;

    let state = controller.snapshot().await;
    assert!(!state.filters_pending);
    let expected = listing_store::filter_properties(&state.properties, &state.filters);
    assert_eq!(state.filtered_properties, expected);
}

#[tokio::test]
async fn clear_filters_cancels_pending_apply() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    controller.fetch_properties().await;

    controller
        .set_filters(PropertyFilters::default().with_search("nowhere"))
        .await;
    controller.clear_filters().await;
    tokio::time::sleep(Duration::from_millis(80)).await;

    let state = controller.snapshot().await;
    assert_eq!(state.filters, PropertyFilters::default());
    assert_eq!(state.current_page, 1);
    assert!(!state.filtering);
    assert!(!state.filters_pending);
    assert_eq!(ids(&state.filtered_properties), vec!["a", "b"]);
}

#[tokio::test]
async fn set_filters_now_skips_the_delay() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    controller.fetch_properties().await;

    controller
        .set_filters_now(
            PropertyFilters::default().with_price_range(1_000_000.0, 5_000_000.0),
        )
        .await;

    let state = controller.snapshot().await;
    assert_eq!(ids(&state.filtered_properties), vec!["c"]);
    assert!(!state.filters_pending);
    assert!(!state.has_more);
}

#[tokio::test]
async fn pagination_helpers_follow_unfiltered_count() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    controller.fetch_properties().await;

    assert_eq!(controller.total_pages().await, 2);
    assert!(controller.can_go_next().await);
    assert!(!controller.can_go_previous().await);

    controller.set_page(2).await;
    assert!(!controller.can_go_next().await);
    assert!(controller.can_go_previous().await);

    controller.set_items_per_page(3).await;
    assert!(controller.visible_properties().await.is_empty());
    assert_eq!(controller.total_pages().await, 1);
}

#[tokio::test]
async fn seeded_listings_show_before_fetch() {
    let seed = sample_properties();
    let source = Arc::new(MemorySource::new(Vec::new()));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let options = ControllerOptions {
        initial_properties: seed.clone(),
        ..options()
    };
    let controller = PropertiesController::with_clock(source.clone(), options, clock);

    let state = controller.snapshot().await;
    assert_eq!(state.filtered_properties, seed[..2].to_vec());
    assert!(!controller.is_cache_valid().await);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn reset_returns_to_configured_defaults() {
    let source = Arc::new(MemorySource::new(three_listings()));
    let (controller, _) = controller(source);
    controller.fetch_properties().await;
    controller.set_items_per_page(10).await;
    controller
        .set_filters_now(PropertyFilters::default().with_cities(["Nice"]))
        .await;

    controller.reset().await;

    let state = controller.snapshot().await;
    assert!(state.properties.is_empty());
    assert_eq!(state.items_per_page, 2);
    assert_eq!(state.filters, PropertyFilters::default());
    assert_eq!(state.cache_expiry, Duration::from_secs(60));
}
