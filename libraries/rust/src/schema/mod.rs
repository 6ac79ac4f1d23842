pub mod bar;
pub mod listing;
pub mod mover;
pub mod query;
pub mod ticker;

pub use bar::PriceBar;
pub use listing::{CompanyListing, MarketListing};
pub use mover::MoverEntry;
pub use query::ResolvedQuery;
pub use ticker::TickerCode;
