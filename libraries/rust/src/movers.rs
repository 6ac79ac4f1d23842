use crate::cache::{Cached, TtlCache};
use crate::calendar;
use crate::data::MarketData;
use crate::errors::{Error, Result};
use crate::schema::{MarketListing, MoverEntry, PriceBar, TickerCode};
use chrono::{Duration as ChronoDuration, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_RANKED_LIMIT: usize = 10;

/// A trailing week always spans at least two sessions outside long holidays.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

pub const MIN_LOOKBACK_DAYS: i64 = 2;

pub const MAX_LOOKBACK_DAYS: i64 = 365;

pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

const WATCHLIST: [(&str, &str); 10] = [
    ("삼성전자", "005930"),
    ("SK하이닉스", "000660"),
    ("LG에너지솔루션", "373220"),
    ("삼성바이오로직스", "207940"),
    ("현대차", "005380"),
    ("기아", "000270"),
    ("셀트리온", "068270"),
    ("KB금융", "105560"),
    ("NAVER", "035420"),
    ("POSCO홀딩스", "005490"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum MoversStrategy {
    /// A declared watch list, in declaration order, with change computed
    /// from the last two closes of a trailing window.
    Fixed {
        universe: Vec<(String, TickerCode)>,
        lookback_days: i64,
    },
    /// The largest listings by market capitalization, using the listing's
    /// own close and change rate.
    Ranked { limit: usize },
}

impl Default for MoversStrategy {
    fn default() -> Self {
        MoversStrategy::Ranked {
            limit: DEFAULT_RANKED_LIMIT,
        }
    }
}

pub fn default_universe() -> Vec<(String, TickerCode)> {
    WATCHLIST
        .iter()
        .filter_map(|(name, code)| {
            TickerCode::parse(code)
                .ok()
                .map(|code| (name.to_string(), code))
        })
        .collect()
}

pub fn clamp_refresh_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL)
}

/// `(last - previous) / previous * 100`, undefined for a zero previous close.
pub fn change_percent(previous: f64, last: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !last.is_finite() {
        return None;
    }

    Some((last - previous) / previous * 100.0)
}

/// Needs at least two chronologically ordered bars.
pub fn mover_from_bars(name: &str, code: &TickerCode, bars: &[PriceBar]) -> Option<MoverEntry> {
    let [.., previous, last] = bars else {
        return None;
    };

    Some(MoverEntry {
        name: name.to_string(),
        code: code.clone(),
        last_close: last.close,
        change_percent: change_percent(previous.close, last.close)?,
    })
}

/// Stable sort by descending market cap, so ties keep listing order.
pub fn rank_by_market_cap(mut listings: Vec<MarketListing>, limit: usize) -> Vec<MoverEntry> {
    listings.sort_by(|a, b| b.market_cap.cmp(&a.market_cap));

    listings
        .into_iter()
        .take(limit)
        .map(|listing| MoverEntry {
            name: listing.name,
            code: listing.code,
            last_close: listing.last_close,
            change_percent: listing.change_percent,
        })
        .collect()
}

/// Fetches each ticker in turn. Failed fetches and short series are
/// skipped; a non-empty universe that yields no movers at all is an error.
pub async fn fixed_set_movers(
    market: &dyn MarketData,
    universe: &[(String, TickerCode)],
    lookback_days: i64,
    today: NaiveDate,
) -> Result<Vec<MoverEntry>> {
    let lookback_days = lookback_days.clamp(MIN_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS);

    let start = today
        .checked_sub_signed(ChronoDuration::days(lookback_days))
        .ok_or_else(|| {
            Error::InvalidInput(format!("{lookback_days} days before {today} is out of range"))
        })?;

    let mut movers = Vec::with_capacity(universe.len());
    let mut failures = 0;

    for (name, code) in universe {
        match market.fetch_history(code.clone(), start, today).await {
            Ok(mut bars) => {
                bars.sort_by_key(|bar| bar.date);

                match mover_from_bars(name, code, &bars) {
                    Some(mover) => movers.push(mover),
                    None => debug!("skipping {} ({}): {} sessions", name, code, bars.len()),
                }
            }
            Err(e) => {
                failures += 1;
                warn!("skipping {} ({}): {}", name, code, e);
            }
        }
    }

    if !universe.is_empty() && failures == universe.len() {
        return Err(Error::Fetch(format!(
            "all {} watch list fetches failed",
            universe.len()
        )));
    }

    if !universe.is_empty() && movers.is_empty() {
        return Err(Error::Fetch(format!(
            "no watch list entry had two sessions in the last {lookback_days} days"
        )));
    }

    Ok(movers)
}

/// An empty market listing (a holiday trade date, for one) is an error so
/// the previous snapshot keeps being served.
pub async fn ranked_movers(market: &dyn MarketData, limit: usize) -> Result<Vec<MoverEntry>> {
    let listings = market.fetch_market_listing().await?;

    if listings.is_empty() {
        return Err(Error::Fetch("market listing has no rows".to_string()));
    }

    Ok(rank_by_market_cap(listings, limit))
}

/// Cached movers list. A failed refresh serves the last known good list.
pub struct MoversSnapshot {
    market: Arc<dyn MarketData>,
    strategy: MoversStrategy,
    cache: TtlCache<Vec<MoverEntry>>,
}

impl MoversSnapshot {
    pub fn new(
        market: Arc<dyn MarketData>,
        strategy: MoversStrategy,
        refresh_interval: Duration,
    ) -> Self {
        MoversSnapshot {
            market,
            strategy,
            cache: TtlCache::new("movers", Some(refresh_interval)),
        }
    }

    pub fn strategy(&self) -> &MoversStrategy {
        &self.strategy
    }

    pub async fn get_movers(&self) -> Cached<Vec<MoverEntry>> {
        self.cache.get_or_refresh(|| self.refresh()).await
    }

    async fn refresh(&self) -> Result<Vec<MoverEntry>> {
        let movers = match &self.strategy {
            MoversStrategy::Fixed {
                universe,
                lookback_days,
            } => {
                fixed_set_movers(
                    self.market.as_ref(),
                    universe,
                    *lookback_days,
                    calendar::today(),
                )
                .await?
            }
            MoversStrategy::Ranked { limit } => ranked_movers(self.market.as_ref(), *limit).await?,
        };

        info!("refreshed {} movers", movers.len());

        Ok(movers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MockMarketData;
    use mockall::predicate::eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn code(value: &str) -> TickerCode {
        TickerCode::parse(value).unwrap()
    }

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(index, &close)| PriceBar {
                date: date(10 + index as u32),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100,
            })
            .collect()
    }

    fn market_listing(value: &str, name: &str, market_cap: u64) -> MarketListing {
        MarketListing {
            code: code(value),
            name: name.to_string(),
            market: "KOSPI".to_string(),
            last_close: 1000.0,
            change_percent: 0.5,
            market_cap,
        }
    }

    #[test]
    fn test_change_percent() {
        assert_eq!(change_percent(100.0, 105.0), Some(5.0));
        assert!((change_percent(200.0, 190.0).unwrap() + 5.0).abs() < 1e-9);
        assert_eq!(change_percent(0.0, 105.0), None);
    }

    #[test]
    fn test_mover_from_bars_requires_two_sessions() {
        assert!(mover_from_bars("삼성전자", &code("005930"), &bars(&[100.0])).is_none());
        assert!(mover_from_bars("삼성전자", &code("005930"), &[]).is_none());

        let mover = mover_from_bars("삼성전자", &code("005930"), &bars(&[90.0, 100.0, 105.0])).unwrap();

        assert_eq!(mover.last_close, 105.0);
        assert!((mover.change_percent - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_by_market_cap() {
        let listings: Vec<MarketListing> = (0..15)
            .map(|i| market_listing(&format!("{:06}", i), &format!("종목{i}"), i as u64 * 10))
            .collect();

        let movers = rank_by_market_cap(listings, DEFAULT_RANKED_LIMIT);

        assert_eq!(movers.len(), 10);
        assert_eq!(movers[0].name, "종목14");
        assert_eq!(movers[9].name, "종목5");
    }

    #[test]
    fn test_rank_by_market_cap_ties_keep_input_order() {
        let listings = vec![
            market_listing("000001", "first", 50),
            market_listing("000002", "largest", 90),
            market_listing("000003", "second", 50),
        ];

        let names: Vec<String> = rank_by_market_cap(listings, 10)
            .into_iter()
            .map(|mover| mover.name)
            .collect();

        assert_eq!(names, vec!["largest", "first", "second"]);
    }

    #[tokio::test]
    async fn test_fixed_set_single_ticker() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .with(eq(code("005930")), eq(date(7)), eq(date(14)))
            .times(1)
            .returning(|_, _, _| Ok(bars(&[100.0, 105.0])));

        let universe = vec![("삼성전자".to_string(), code("005930"))];

        let movers = fixed_set_movers(&market, &universe, DEFAULT_LOOKBACK_DAYS, date(14))
            .await
            .unwrap();

        assert_eq!(movers.len(), 1);
        assert_eq!(movers[0].name, "삼성전자");
        assert_eq!(movers[0].last_close, 105.0);
        assert!((movers[0].change_percent - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fixed_set_skips_failures_and_short_series() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .returning(|ticker, _, _| match ticker.as_str() {
                "005930" => Err(Error::Fetch("connection reset".to_string())),
                "000660" => Ok(bars(&[180.0])),
                _ => Ok(bars(&[50.0, 40.0])),
            });

        let universe = vec![
            ("삼성전자".to_string(), code("005930")),
            ("SK하이닉스".to_string(), code("000660")),
            ("NAVER".to_string(), code("035420")),
            ("기아".to_string(), code("000270")),
        ];

        let movers = fixed_set_movers(&market, &universe, DEFAULT_LOOKBACK_DAYS, date(14))
            .await
            .unwrap();

        let names: Vec<&str> = movers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["NAVER", "기아"]);
        assert!((movers[0].change_percent + 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fixed_set_all_failures_is_error() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .returning(|_, _, _| Err(Error::Fetch("offline".to_string())));

        let result =
            fixed_set_movers(&market, &default_universe(), DEFAULT_LOOKBACK_DAYS, date(14)).await;

        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn test_fixed_set_without_any_mover_is_error() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .returning(|_, _, _| Ok(bars(&[100.0])));

        let result =
            fixed_set_movers(&market, &default_universe(), DEFAULT_LOOKBACK_DAYS, date(14)).await;

        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn test_fixed_set_lookback_is_bounded() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .withf(|_, start, end| *end - *start == ChronoDuration::days(MAX_LOOKBACK_DAYS))
            .times(1)
            .returning(|_, _, _| Ok(bars(&[100.0, 101.0])));

        let universe = vec![("삼성전자".to_string(), code("005930"))];

        let movers = fixed_set_movers(&market, &universe, 100_000_000, date(14))
            .await
            .unwrap();

        assert_eq!(movers.len(), 1);
    }

    #[tokio::test]
    async fn test_ranked_empty_listing_is_error() {
        let mut market = MockMarketData::new();

        market.expect_fetch_market_listing().returning(|| Ok(Vec::new()));

        let result = ranked_movers(&market, DEFAULT_RANKED_LIMIT).await;

        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn test_snapshot_keeps_previous_movers_after_empty_refresh() {
        let mut market = MockMarketData::new();
        let mut calls = 0;

        market.expect_fetch_market_listing().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![market_listing("005930", "삼성전자", 100)])
            } else {
                Ok(Vec::new())
            }
        });

        let snapshot = MoversSnapshot::new(
            Arc::new(market),
            MoversStrategy::default(),
            Duration::from_secs(0),
        );

        assert!(snapshot.get_movers().await.is_fresh());

        match snapshot.get_movers().await {
            Cached::Stale(movers) => assert_eq!(movers[0].name, "삼성전자"),
            other => panic!("expected stale movers, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_snapshot_serves_stale_after_failed_refresh() {
        let mut market = MockMarketData::new();
        let mut calls = 0;

        market.expect_fetch_market_listing().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![market_listing("005930", "삼성전자", 100)])
            } else {
                Err(Error::Fetch("offline".to_string()))
            }
        });

        let snapshot = MoversSnapshot::new(
            Arc::new(market),
            MoversStrategy::default(),
            Duration::from_secs(0),
        );

        let first = snapshot.get_movers().await;
        let second = snapshot.get_movers().await;

        assert!(first.is_fresh());
        match second {
            Cached::Stale(movers) => assert_eq!(movers[0].name, "삼성전자"),
            other => panic!("expected stale movers, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_snapshot_unavailable_without_data() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_market_listing()
            .returning(|| Err(Error::Fetch("offline".to_string())));

        let snapshot = MoversSnapshot::new(
            Arc::new(market),
            MoversStrategy::default(),
            MAX_REFRESH_INTERVAL,
        );

        assert!(matches!(snapshot.get_movers().await, Cached::Unavailable));
    }

    #[test]
    fn test_clamp_refresh_interval() {
        assert_eq!(clamp_refresh_interval(Duration::from_secs(60)), MIN_REFRESH_INTERVAL);
        assert_eq!(clamp_refresh_interval(Duration::from_secs(86_400)), MAX_REFRESH_INTERVAL);
        assert_eq!(
            clamp_refresh_interval(Duration::from_secs(1800)),
            Duration::from_secs(1800)
        );
    }

    #[test]
    fn test_default_universe() {
        let universe = default_universe();

        assert_eq!(universe.len(), WATCHLIST.len());
        assert_eq!(universe[0], ("삼성전자".to_string(), code("005930")));
    }
}
