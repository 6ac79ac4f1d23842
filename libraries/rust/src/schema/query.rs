use crate::schema::ticker::TickerCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User input resolved to a ticker code, paired with the requested range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedQuery {
    pub raw_input: String,
    pub code: TickerCode,
    pub start: NaiveDate,
    pub end: NaiveDate,
}
