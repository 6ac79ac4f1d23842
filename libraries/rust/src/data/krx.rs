use crate::errors::{Error, Result};
use crate::schema::{MarketListing, TickerCode};
use chrono::NaiveDate;
use reqwest::Client as HTTPClient;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

const KRX_REFERER: &str = "http://data.krx.co.kr/contents/MDC/MDI/mdiLoader";

/// All-market closing prices with market capitalization.
const MARKET_LISTING_BLD: &str = "dbms/MDC/STAT/standard/MDCSTAT01501";

#[derive(Deserialize, Debug)]
struct MarketListingResponse {
    #[serde(rename = "OutBlock_1", default)]
    rows: Vec<MarketListingRow>,
}

#[derive(Deserialize, Debug)]
struct MarketListingRow {
    #[serde(rename = "ISU_SRT_CD")]
    code: String,
    #[serde(rename = "ISU_ABBRV")]
    name: String,
    #[serde(rename = "MKT_NM", default)]
    market: String,
    #[serde(rename = "TDD_CLSPRC")]
    close: String,
    #[serde(rename = "FLUC_RT")]
    change_rate: String,
    #[serde(rename = "MKTCAP")]
    market_cap: String,
}

pub async fn fetch_market_listing(
    http_client: &HTTPClient,
    data_url: &Url,
    trade_date: NaiveDate,
) -> Result<Vec<MarketListing>> {
    let trade_date = trade_date.format("%Y%m%d").to_string();

    let response = http_client
        .post(data_url.clone())
        .header("Referer", KRX_REFERER)
        .header("User-Agent", "Mozilla/5.0")
        .form(&[
            ("bld", MARKET_LISTING_BLD),
            ("locale", "ko_KR"),
            ("mktId", "ALL"),
            ("trdDd", trade_date.as_str()),
            ("share", "1"),
            ("money", "1"),
            ("csvxls_isNo", "false"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::Fetch(format!(
            "KRX market listing request failed with status: {}",
            response.status()
        )));
    }

    let body = response.text().await?;

    let listings = parse_market_listing(&body)?;

    info!(
        "fetched {} market listings for {}",
        listings.len(),
        trade_date
    );

    Ok(listings)
}

/// Rows without a usable code, close, change rate or market cap (suspended
/// issues report `-`) are skipped.
pub fn parse_market_listing(body: &str) -> Result<Vec<MarketListing>> {
    let response: MarketListingResponse = serde_json::from_str(body)?;

    let listings = response
        .rows
        .into_iter()
        .filter_map(|row| {
            let listing = to_listing(&row);
            if listing.is_none() {
                debug!("skipping market listing row {:?}", row);
            }
            listing
        })
        .collect();

    Ok(listings)
}

fn to_listing(row: &MarketListingRow) -> Option<MarketListing> {
    Some(MarketListing {
        code: TickerCode::parse(row.code.trim()).ok()?,
        name: row.name.trim().to_string(),
        market: row.market.trim().to_string(),
        last_close: parse_grouped_number(&row.close)?,
        change_percent: parse_grouped_number(&row.change_rate)?,
        market_cap: row.market_cap.trim().replace(',', "").parse().ok()?,
    })
}

/// `"1,234.5"` → `1234.5`
fn parse_grouped_number(value: &str) -> Option<f64> {
    value.trim().replace(',', "").parse().ok()
}
