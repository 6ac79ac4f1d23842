use std::sync::Arc;

use stockboard::config::Config;
use stockboard::data::{kind, market, ListingSource, MarketData};
use stockboard::listing::ListingCache;
use stockboard::movers::MoversSnapshot;
use stockboard::resolver::Resolver;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub title: Option<String>,
    pub resolver: Resolver,
    pub market: Arc<dyn MarketData>,
    pub movers: MoversSnapshot,
}

impl AppState {
    pub fn new(
        config: &Config,
        listing_source: Arc<dyn ListingSource>,
        market: Arc<dyn MarketData>,
    ) -> Self {
        let listings = Arc::new(ListingCache::new(listing_source, config.listing_ttl));

        AppState {
            title: config.title.clone(),
            resolver: Resolver::new(listings),
            movers: MoversSnapshot::new(
                market.clone(),
                config.movers_strategy.clone(),
                config.movers_refresh,
            ),
            market,
        }
    }

    pub fn from_config(config: &Config) -> stockboard::Result<Self> {
        let http_client = config.http_client()?;

        let listing_source = kind::Client::new(&config.listing_url, http_client.clone())?;

        let market = market::Client::new(&config.chart_url, &config.krx_data_url, http_client)?;

        Ok(AppState::new(config, Arc::new(listing_source), Arc::new(market)))
    }
}
