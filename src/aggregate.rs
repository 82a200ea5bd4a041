//! Summary statistics over an ingested store.
//!
//! All functions take a plain `&[Event]`, so they work on an
//! [`EventStore`](crate::EventStore) through deref and never mutate it. They
//! make no assumption about record order.

use crate::event::{Event, EventKind};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Event counts by kind and purchase revenue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of the prices of purchase events.
    pub total_revenue: f64,
    pub views: u64,
    pub carts: u64,
    pub removals: u64,
    pub purchases: u64,
}

impl Summary {
    /// Count one event.
    pub fn add(&mut self, event: &Event<'_>) {
        match event.kind {
            EventKind::View => self.views += 1,
            EventKind::AddToCart => self.carts += 1,
            EventKind::RemoveFromCart => self.removals += 1,
            EventKind::Purchase => {
                self.purchases += 1;
                self.total_revenue += event.price;
            }
            EventKind::Unrecognized => {}
        }
    }

    pub fn merge(&mut self, other: &Summary) {
        self.total_revenue += other.total_revenue;
        self.views += other.views;
        self.carts += other.carts;
        self.removals += other.removals;
        self.purchases += other.purchases;
    }

    #[must_use]
    pub fn total_events(&self) -> u64 {
        self.views + self.carts + self.removals + self.purchases
    }
}

/// Single linear pass over `events`.
#[must_use]
pub fn summarize(events: &[Event<'_>]) -> Summary {
    events.iter().fold(Summary::default(), |mut acc, ev| {
        acc.add(ev);
        acc
    })
}

/// [`summarize`] on the rayon pool.
///
/// Counts are identical to the sequential pass; revenue may differ in the last
/// bits because the floating-point additions happen in a different order.
#[must_use]
pub fn summarize_par(events: &[Event<'_>]) -> Summary {
    events
        .par_iter()
        .fold(Summary::default, |mut acc, ev| {
            acc.add(ev);
            acc
        })
        .reduce(Summary::default, |mut a, b| {
            a.merge(&b);
            a
        })
}

/// Views and purchases of one product.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductStats {
    pub views: u64,
    pub purchases: u64,
}

impl ProductStats {
    /// Purchases per view, in percent. Zero when there are no views.
    #[must_use]
    pub fn conversion_rate(&self) -> f64 {
        if self.views == 0 {
            0.0
        } else {
            self.purchases as f64 / self.views as f64 * 100.0
        }
    }
}

/// Per-product view and purchase counts.
///
/// Only view and purchase events create entries.
#[must_use]
pub fn product_stats(events: &[Event<'_>]) -> HashMap<u64, ProductStats> {
    let mut out: HashMap<u64, ProductStats> = HashMap::new();
    for ev in events {
        match ev.kind {
            EventKind::View => out.entry(ev.product_id).or_default().views += 1,
            EventKind::Purchase => out.entry(ev.product_id).or_default().purchases += 1,
            _ => {}
        }
    }
    out
}

/// Activity thresholds for [`top_by_conversion`]. Both bounds are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionFilter {
    pub min_views: u64,
    pub min_purchases: u64,
}

impl Default for ConversionFilter {
    fn default() -> Self {
        Self { min_views: 100, min_purchases: 10 }
    }
}

/// A product ranked by conversion rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProductRank {
    pub product_id: u64,
    pub stats: ProductStats,
    /// Purchases per view, in percent.
    pub conversion_rate: f64,
}

/// The `n` products with the highest conversion rate among those with more
/// than `filter.min_views` views and more than `filter.min_purchases`
/// purchases.
///
/// Ties on rate are ordered by product id, highest first.
#[must_use]
pub fn top_by_conversion(
    stats: &HashMap<u64, ProductStats>,
    n: usize,
    filter: ConversionFilter,
) -> Vec<ProductRank> {
    let mut ranked: Vec<ProductRank> = stats
        .iter()
        .filter(|(_, s)| s.views > filter.min_views && s.purchases > filter.min_purchases)
        .map(|(&product_id, &s)| ProductRank {
            product_id,
            stats: s,
            conversion_rate: s.conversion_rate(),
        })
        .collect();
    ranked.sort_unstable_by_key(|r| Reverse((OrderedFloat(r.conversion_rate), r.product_id)));
    ranked.truncate(n);
    ranked
}
