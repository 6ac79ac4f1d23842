pub mod errors;
pub mod health;
pub mod history;
pub mod index;
pub mod movers;
pub mod resolve;
