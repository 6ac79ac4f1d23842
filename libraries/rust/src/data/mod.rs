pub mod client;

#[cfg(feature = "http")]
pub mod kind;
#[cfg(feature = "http")]
pub mod krx;
#[cfg(feature = "http")]
pub mod market;
#[cfg(feature = "http")]
pub mod naver;

pub use client::{ListingSource, MarketData, MockListingSource, MockMarketData};
