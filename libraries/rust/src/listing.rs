use crate::cache::{Cached, TtlCache};
use crate::data::ListingSource;
use crate::errors::{Error, Result};
use crate::schema::{CompanyListing, TickerCode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// An immutable snapshot of the company directory. When several listings
/// share a name, the first one is used for lookups.
#[derive(Debug, Default)]
pub struct ListingIndex {
    listings: Vec<CompanyListing>,
    by_name: HashMap<String, usize>,
}

impl ListingIndex {
    pub fn new(listings: Vec<CompanyListing>) -> Self {
        let mut by_name = HashMap::with_capacity(listings.len());

        for (index, listing) in listings.iter().enumerate() {
            by_name.entry(listing.name.clone()).or_insert(index);
        }

        ListingIndex { listings, by_name }
    }

    /// Exact, case-sensitive name lookup.
    pub fn code_for(&self, name: &str) -> Option<&TickerCode> {
        self.by_name
            .get(name)
            .map(|&index| &self.listings[index].code)
    }

    pub fn listings(&self) -> &[CompanyListing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Process-wide company directory. A failed fetch degrades to the last
/// known good listing, or to an empty one, and is retried on the next call.
pub struct ListingCache {
    source: Arc<dyn ListingSource>,
    cache: TtlCache<ListingIndex>,
}

impl ListingCache {
    pub fn new(source: Arc<dyn ListingSource>, ttl: Option<Duration>) -> Self {
        ListingCache {
            source,
            cache: TtlCache::new("listings", ttl),
        }
    }

    pub async fn get(&self) -> Cached<ListingIndex> {
        self.cache
            .get_or_refresh(|| self.fetch_index())
            .await
    }

    /// A page without a single listing is treated as a failed fetch.
    async fn fetch_index(&self) -> Result<ListingIndex> {
        let listings = self.source.fetch_listings().await?;

        if listings.is_empty() {
            return Err(Error::Fetch("company listing has no rows".to_string()));
        }

        Ok(ListingIndex::new(listings))
    }

    pub async fn get_listings(&self) -> Arc<ListingIndex> {
        match self.get().await {
            Cached::Fresh(index) | Cached::Stale(index) => index,
            Cached::Unavailable => {
                warn!("company listing unavailable, only ticker codes will resolve");
                Arc::new(ListingIndex::default())
            }
        }
    }
}
