use crate::data::MarketData;
use crate::errors::Result;
use crate::indicators::{self, MovingAverage};
use crate::schema::{PriceBar, ResolvedQuery, TickerCode};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

/// Bars for one ticker over the requested range, oldest first. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceHistory {
    pub code: TickerCode,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    /// No trading sessions in range. This is a successful result.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn moving_averages(&self, windows: &[usize]) -> Vec<MovingAverage> {
        indicators::moving_averages(&self.bars, windows)
    }
}

/// Orders a range so that `start <= end`.
pub fn normalize_range(start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    if start > end {
        debug!("swapping reversed range {} .. {}", start, end);
        (end, start)
    } else {
        (start, end)
    }
}

pub async fn fetch_history(market: &dyn MarketData, query: &ResolvedQuery) -> Result<PriceHistory> {
    let (start, end) = normalize_range(query.start, query.end);

    let mut bars = market.fetch_history(query.code.clone(), start, end).await?;

    bars.sort_by_key(|bar| bar.date);

    if bars.is_empty() {
        info!("no trading sessions for {} between {} and {}", query.code, start, end);
    }

    Ok(PriceHistory {
        code: query.code.clone(),
        start,
        end,
        bars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MockMarketData;
    use crate::errors::Error;
    use mockall::predicate::eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: date(2024, 1, day),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn query(start: NaiveDate, end: NaiveDate) -> ResolvedQuery {
        ResolvedQuery {
            raw_input: "삼성전자".to_string(),
            code: TickerCode::parse("005930").unwrap(),
            start,
            end,
        }
    }

    #[tokio::test]
    async fn test_fetch_history_orders_bars() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .times(1)
            .returning(|_, _, _| Ok(vec![bar(3, 102.0), bar(2, 101.0)]));

        let history = fetch_history(&market, &query(date(2024, 1, 1), date(2024, 1, 5)))
            .await
            .unwrap();

        assert_eq!(history.bars, vec![bar(2, 101.0), bar(3, 102.0)]);
        assert!(!history.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_history_without_sessions_is_empty_success() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .returning(|_, _, _| Ok(Vec::new()));

        let history = fetch_history(&market, &query(date(2024, 2, 10), date(2024, 2, 12)))
            .await
            .unwrap();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_history_propagates_fetch_error() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .returning(|_, _, _| Err(Error::Fetch("502 Bad Gateway".to_string())));

        let result = fetch_history(&market, &query(date(2024, 1, 1), date(2024, 1, 5))).await;

        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn test_fetch_history_swaps_reversed_range() {
        let mut market = MockMarketData::new();

        market
            .expect_fetch_history()
            .with(
                eq(TickerCode::parse("005930").unwrap()),
                eq(date(2024, 1, 1)),
                eq(date(2024, 1, 31)),
            )
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let history = fetch_history(&market, &query(date(2024, 1, 31), date(2024, 1, 1)))
            .await
            .unwrap();

        assert_eq!(history.start, date(2024, 1, 1));
        assert_eq!(history.end, date(2024, 1, 31));
    }
}
