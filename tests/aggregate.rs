use clickstream::testing::{fixture_bytes, EventLineBuilder};
use clickstream::*;
use std::collections::HashMap;

fn event(kind: EventKind, product_id: u64, price: f64) -> Event<'static> {
    Event {
        time: Timestamp::default(),
        kind,
        product_id,
        category_id: 0,
        category_code: CategoryCode::default(),
        brand: "",
        price,
        user_id: 7,
        session: "",
    }
}

#[test]
fn summary_counts_kinds_and_purchase_revenue() {
    let events = vec![
        event(EventKind::View, 1, 10.0),
        event(EventKind::View, 2, 20.0),
        event(EventKind::AddToCart, 1, 10.0),
        event(EventKind::RemoveFromCart, 1, 10.0),
        event(EventKind::Purchase, 1, 10.5),
        event(EventKind::Purchase, 2, 20.25),
    ];
    let s = summarize(&events);
    assert_eq!(s.views, 2);
    assert_eq!(s.carts, 1);
    assert_eq!(s.removals, 1);
    assert_eq!(s.purchases, 2);
    assert!((s.total_revenue - 30.75).abs() < 1e-9);
    assert_eq!(s.total_events(), 6);
}

#[test]
fn summary_of_nothing_is_zero() {
    assert_eq!(summarize(&[]), Summary::default());
}

#[test]
fn parallel_summary_matches() {
    let events: Vec<_> = (0..10_000u64)
        .map(|i| {
            let kind = match i % 4 {
                0 => EventKind::View,
                1 => EventKind::AddToCart,
                2 => EventKind::RemoveFromCart,
                _ => EventKind::Purchase,
            };
            event(kind, i % 13 + 1, 1.25)
        })
        .collect();
    let seq = summarize(&events);
    let par = summarize_par(&events);
    assert_eq!((par.views, par.carts, par.removals, par.purchases), (seq.views, seq.carts, seq.removals, seq.purchases));
    assert!((par.total_revenue - seq.total_revenue).abs() < 1e-6);
}

#[test]
fn product_stats_only_track_views_and_purchases() {
    let events = vec![
        event(EventKind::View, 1, 0.0),
        event(EventKind::View, 1, 0.0),
        event(EventKind::Purchase, 1, 0.0),
        event(EventKind::AddToCart, 2, 0.0),
        event(EventKind::Purchase, 3, 0.0),
    ];
    let stats = product_stats(&events);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[&1], ProductStats { views: 2, purchases: 1 });
    assert_eq!(stats[&3], ProductStats { views: 0, purchases: 1 });
    assert!(!stats.contains_key(&2));
}

#[test]
fn conversion_rate_in_percent() {
    assert_eq!(ProductStats { views: 200, purchases: 50 }.conversion_rate(), 25.0);
    assert_eq!(ProductStats { views: 0, purchases: 5 }.conversion_rate(), 0.0);
}

#[test]
fn top_by_conversion_filters_and_ranks() {
    let stats: HashMap<u64, ProductStats> = HashMap::from([
        (1, ProductStats { views: 200, purchases: 20 }),  // 10%
        (2, ProductStats { views: 101, purchases: 11 }),  // ~10.9%
        (3, ProductStats { views: 100, purchases: 90 }),  // views not > 100
        (4, ProductStats { views: 500, purchases: 10 }),  // purchases not > 10
        (5, ProductStats { views: 1000, purchases: 300 }), // 30%
        (6, ProductStats { views: 400, purchases: 40 }),  // 10%, ties with 1
    ]);
    let top = top_by_conversion(&stats, 10, ConversionFilter::default());
    let ids: Vec<u64> = top.iter().map(|r| r.product_id).collect();
    assert_eq!(ids, vec![5, 2, 6, 1]);
    assert!((top[0].conversion_rate - 30.0).abs() < 1e-9);
    assert_eq!(top[0].stats, ProductStats { views: 1000, purchases: 300 });

    let top2 = top_by_conversion(&stats, 2, ConversionFilter::default());
    assert_eq!(top2.len(), 2);

    let loose = top_by_conversion(&stats, 10, ConversionFilter { min_views: 0, min_purchases: 0 });
    assert_eq!(loose.len(), 6);
    assert_eq!(loose[0].product_id, 3);
}

#[test]
fn aggregates_read_a_session_store() -> anyhow::Result<()> {
    let lines: Vec<String> = [("view", "10"), ("view", "10"), ("purchase", "10"), ("cart", "11")]
        .iter()
        .map(|(kind, pid)| EventLineBuilder::new().kind(*kind).product_id(*pid).price("2.50").build())
        .collect();
    let data = fixture_bytes(&lines);
    let mut session = ParseSession::new(IngestConfig::default().with_capacity_hint(8))?;
    session.ingest_bytes(&data);
    let done = session.finish();

    let summary = summarize(&done.events);
    assert_eq!(summary.purchases, 1);
    assert!((summary.total_revenue - 2.5).abs() < 1e-9);
    let stats = product_stats(&done.events);
    assert_eq!(stats[&10], ProductStats { views: 2, purchases: 1 });
    Ok(())
}
