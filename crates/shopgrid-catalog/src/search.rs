//! The ranked-retrieval engine: a bounded scan over one pre-sorted grid cell.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::geo::haversine_distance_meters;
use crate::query::SearchQuery;

/// The shop fields a caller is allowed to see. The shop id is withheld on
/// purpose.
#[derive(Debug, Clone, Serialize)]
pub struct ShopView {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub tags: Vec<String>,
}

/// One search result. The product id is withheld on purpose.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub shop: ShopView,
    pub popularity: f64,
    pub quantity: u32,
}

/// Search products near a point, read-only against the immutable catalog and
/// safe to call concurrently.
///
/// Results come back in the cell's stored order (popularity descending, load
/// order on ties); nothing is re-sorted after filtering. The scan stops as
/// soon as `count` results accumulate, which bounds work to O(count) in the
/// common case. That early stop also means an in-radius entry ranked lower in
/// the cell can be missed when the cap is reached first — a known
/// throughput/precision trade-off, not a bug.
///
/// A query point outside the grid is not an error, merely no coverage:
/// the result is empty.
#[must_use]
pub fn search(catalog: &Catalog, query: &SearchQuery) -> Vec<SearchHit> {
    let Some((x, y)) = catalog.grid().config().cell_for(query.lat, query.lng) else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for entry in catalog.grid().cell(x, y) {
        if hits.len() >= query.count {
            break;
        }
        let Some(shop) = catalog.shop(&entry.shop_id) else {
            continue;
        };

        let distance =
            haversine_distance_meters(query.lat, query.lng, shop.lat, shop.lng);
        if distance > f64::from(query.radius) {
            continue;
        }

        if !query.tags.is_empty() && !shop.tags.iter().any(|t| query.tags.contains(t)) {
            continue;
        }

        hits.push(SearchHit {
            title: entry.title.clone(),
            shop: ShopView {
                name: shop.name.clone(),
                lat: shop.lat,
                lng: shop.lng,
                tags: shop.tags.clone(),
            },
            popularity: entry.popularity,
            quantity: entry.quantity,
        });
    }
    hits
}
