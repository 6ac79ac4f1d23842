use crate::data::client::ListingSource;
use crate::errors::{Error, Result};
use crate::schema::{CompanyListing, TickerCode};
use async_trait::async_trait;
use encoding_rs::EUC_KR;
use reqwest::Client as HTTPClient;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

const NAME_COLUMN: &str = "회사명";

const CODE_COLUMN: &str = "종목코드";

/// Client for the KIND corporate directory download, an HTML table served
/// in EUC-KR.
#[derive(Clone)]
pub struct Client {
    listing_url: Url,
    http_client: HTTPClient,
}

impl Client {
    pub fn new(listing_url: &str, http_client: HTTPClient) -> Result<Self> {
        Ok(Client {
            listing_url: Url::parse(listing_url)?,
            http_client,
        })
    }
}

#[async_trait]
impl ListingSource for Client {
    async fn fetch_listings(&self) -> Result<Vec<CompanyListing>> {
        let response = self
            .http_client
            .get(self.listing_url.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "KIND listing request failed with status: {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;

        let listings = parse_listing_page(&body)?;

        info!("fetched {} company listings", listings.len());

        Ok(listings)
    }
}

/// The source never declares UTF-8, so the declared charset is ignored.
pub fn decode_euc_kr(bytes: &[u8]) -> String {
    let (text, _, had_errors) = EUC_KR.decode(bytes);

    if had_errors {
        debug!("listing page contained malformed EUC-KR sequences");
    }

    text.into_owned()
}

pub fn parse_listing_page(bytes: &[u8]) -> Result<Vec<CompanyListing>> {
    parse_listing_table(&decode_euc_kr(bytes))
}

/// Extracts the company name and ticker code columns. Rows without a name
/// or with a code that is not 1-6 digits are skipped.
pub fn parse_listing_table(html: &str) -> Result<Vec<CompanyListing>> {
    let document = Html::parse_document(html);

    let row_selector = Selector::parse("tr").map_err(|e| Error::Parse(e.to_string()))?;
    let cell_selector = Selector::parse("th, td").map_err(|e| Error::Parse(e.to_string()))?;

    let mut rows = document.select(&row_selector);

    let mut columns = None;
    for row in rows.by_ref() {
        let cells = cell_texts(row, &cell_selector);

        let name_index = cells.iter().position(|cell| cell == NAME_COLUMN);
        let code_index = cells.iter().position(|cell| cell == CODE_COLUMN);

        if let (Some(name_index), Some(code_index)) = (name_index, code_index) {
            columns = Some((name_index, code_index));
            break;
        }
    }

    let (name_index, code_index) = columns.ok_or_else(|| {
        Error::Parse(format!(
            "listing table has no '{NAME_COLUMN}' and '{CODE_COLUMN}' header"
        ))
    })?;

    let mut listings = Vec::new();

    for row in rows {
        let cells = cell_texts(row, &cell_selector);

        let (Some(name), Some(raw_code)) = (cells.get(name_index), cells.get(code_index)) else {
            continue;
        };

        if name.is_empty() {
            continue;
        }

        match TickerCode::from_listing(raw_code) {
            Ok(code) => listings.push(CompanyListing {
                name: name.clone(),
                code,
            }),
            Err(e) => debug!("skipping listing row for {}: {}", name, e),
        }
    }

    Ok(listings)
}

fn cell_texts(row: ElementRef, cell_selector: &Selector) -> Vec<String> {
    row.select(cell_selector)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}
