use crate::schema::ticker::TickerCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverEntry {
    pub name: String,
    pub code: TickerCode,
    pub last_close: f64,
    pub change_percent: f64,
}
