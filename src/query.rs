//! Browsing helpers over fetched listings: search, filters, ordering and paging.
//!
//! All of these are pure transforms over an already loaded sequence.
use crate::listing::{Category, Listing};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ListingSort {
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    /// Case-insensitive substring of name, category or location
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<Category>,
    pub location: Option<String>,
    #[serde(default)]
    pub sort: ListingSort,
}

impl BrowseQuery {
    fn matches(&self, listing: &Listing) -> bool {
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            let hit = [
                listing.name.as_str(),
                listing.category.as_str(),
                listing.location.as_str(),
            ]
            .iter()
            .any(|hay| hay.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != listing.category) {
            return false;
        }
        if let Some(location) = &self.location {
            if location != &listing.location {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, listings: Vec<Listing>) -> Vec<Listing> {
        let mut out: Vec<Listing> = listings.into_iter().filter(|l| self.matches(l)).collect();
        sort_listings(&mut out, self.sort);
        out
    }
}

/// Stable sort of listings.
pub fn sort_listings(listings: &mut [Listing], sort: ListingSort) {
    match sort {
        ListingSort::Newest => listings.sort_by_key(|l| Reverse(l.created_at)),
        ListingSort::Oldest => listings.sort_by_key(|l| l.created_at),
        ListingSort::PriceLow => listings.sort_by_key(|l| l.price_per_unit),
        ListingSort::PriceHigh => listings.sort_by_key(|l| Reverse(l.price_per_unit)),
    }
}

/// The `n` most recently created listings.
pub fn latest(mut listings: Vec<Listing>, n: usize) -> Vec<Listing> {
    sort_listings(&mut listings, ListingSort::Newest);
    listings.truncate(n);
    listings
}

/// Distinct locations, newest listing's location first.
pub fn locations(mut listings: Vec<Listing>) -> Vec<String> {
    sort_listings(&mut listings, ListingSort::Newest);
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter_map(|l| seen.insert(l.location.clone()).then_some(l.location))
        .collect()
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: usize,
    pub max_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Cut one page out of `items`. A zero or missing limit uses the default, and
/// limits above the maximum are clamped.
pub fn paginate<T>(items: Vec<T>, params: PageParams, limits: PageLimits) -> Page<T> {
    let total = items.len();
    let offset = params.offset.unwrap_or(0);
    let limit = match params.limit {
        None | Some(0) => limits.default_size,
        Some(n) => n.min(limits.max_size),
    };
    let items = items.into_iter().skip(offset).take(limit).collect();

    Page {
        items,
        total,
        offset,
        limit,
    }
}
