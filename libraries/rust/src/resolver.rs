use crate::errors::{Error, Result};
use crate::listing::ListingCache;
use crate::schema::{ResolvedQuery, TickerCode};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

/// Maps free-form input to a ticker code.
///
/// Input that is already six ASCII digits is returned as is, without
/// checking that the code exists; a non-existent code fails later, at the
/// history fetch. Anything else must match a listed company name exactly.
#[derive(Clone)]
pub struct Resolver {
    listings: Arc<ListingCache>,
}

impl Resolver {
    pub fn new(listings: Arc<ListingCache>) -> Self {
        Resolver { listings }
    }

    pub async fn resolve(&self, raw_input: &str) -> Result<TickerCode> {
        if let Ok(code) = TickerCode::parse(raw_input) {
            debug!("'{}' is already a ticker code", raw_input);
            return Ok(code);
        }

        let index = self.listings.get_listings().await;

        index
            .code_for(raw_input)
            .cloned()
            .ok_or_else(|| Error::NotFound(raw_input.to_string()))
    }

    pub async fn resolve_query(
        &self,
        raw_input: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ResolvedQuery> {
        let code = self.resolve(raw_input).await?;

        Ok(ResolvedQuery {
            raw_input: raw_input.to_string(),
            code,
            start,
            end,
        })
    }
}
