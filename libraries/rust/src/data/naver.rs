use crate::errors::{Error, Result};
use crate::schema::{PriceBar, TickerCode};
use chrono::NaiveDate;
use reqwest::Client as HTTPClient;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

const DATE_FORMAT: &str = "%Y%m%d";

/// Daily OHLCV bars from Naver's chart endpoint, oldest first.
pub async fn fetch_daily_bars(
    http_client: &HTTPClient,
    chart_url: &Url,
    code: &TickerCode,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>> {
    let start_time = start.format(DATE_FORMAT).to_string();
    let end_time = end.format(DATE_FORMAT).to_string();

    debug!("requesting {} bars from {} to {}", code, start_time, end_time);

    let response = http_client
        .get(chart_url.clone())
        .query(&[
            ("symbol", code.as_str()),
            ("requestType", "1"),
            ("startTime", start_time.as_str()),
            ("endTime", end_time.as_str()),
            ("timeframe", "day"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::Fetch(format!(
            "Naver chart request failed with status: {}",
            response.status()
        )));
    }

    let body = response.text().await?;

    parse_chart_body(&body)
}

/// The body is a JavaScript array literal: a header row of single-quoted
/// column names, then `["YYYYMMDD", open, high, low, close, volume, ..]`.
pub fn parse_chart_body(body: &str) -> Result<Vec<PriceBar>> {
    let normalized = body.trim().replace('\'', "\"");

    if normalized.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<Value>> = serde_json::from_str(&normalized)?;

    let mut bars = rows
        .iter()
        .filter(|row| !is_header(row))
        .map(|row| parse_row(row))
        .collect::<Result<Vec<PriceBar>>>()?;

    bars.sort_by_key(|bar| bar.date);

    Ok(bars)
}

fn is_header(row: &[Value]) -> bool {
    match row.first().and_then(Value::as_str) {
        Some(cell) => !cell.trim().chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn parse_row(row: &[Value]) -> Result<PriceBar> {
    let malformed = || Error::Parse(format!("malformed chart row: {row:?}"));

    let date = row
        .first()
        .and_then(Value::as_str)
        .and_then(|cell| NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT).ok())
        .ok_or_else(malformed)?;

    let price = |index: usize| row.get(index).and_then(Value::as_f64).ok_or_else(malformed);

    let volume = row
        .get(5)
        .and_then(|cell| cell.as_u64().or_else(|| cell.as_f64().map(|v| v as u64)))
        .ok_or_else(malformed)?;

    Ok(PriceBar {
        date,
        open: price(1)?,
        high: price(2)?,
        low: price(3)?,
        close: price(4)?,
        volume,
    })
}
