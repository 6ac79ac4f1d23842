use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TICKER_CODE_LENGTH: usize = 6;

/// A KRX ticker code: always six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerCode(String);

impl TickerCode {
    /// Accepts input that is already a well-formed code, unchanged.
    pub fn parse(input: &str) -> Result<Self> {
        if is_ticker_code(input) {
            Ok(TickerCode(input.to_string()))
        } else {
            Err(Error::InvalidTickerCode(input.to_string()))
        }
    }

    /// Normalizes a code as printed by the listing source, which drops
    /// leading zeros (`660` becomes `000660`).
    pub fn from_listing(raw: &str) -> Result<Self> {
        let digits = raw.trim();

        if digits.is_empty()
            || digits.len() > TICKER_CODE_LENGTH
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::InvalidTickerCode(raw.to_string()));
        }

        Ok(TickerCode(format!(
            "{:0>width$}",
            digits,
            width = TICKER_CODE_LENGTH
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn is_ticker_code(input: &str) -> bool {
    input.len() == TICKER_CODE_LENGTH && input.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for TickerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TickerCode {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        TickerCode::parse(input)
    }
}

impl TryFrom<String> for TickerCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        TickerCode::parse(&value)
    }
}

impl From<TickerCode> for String {
    fn from(code: TickerCode) -> Self {
        code.0
    }
}
