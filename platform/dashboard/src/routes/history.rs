use actix_web::{get, web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use stockboard::{calendar, history, indicators};

use crate::routes::errors::{required_query, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct Parameters {
    query: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

#[get("/history")]
pub async fn handler(
    state: web::Data<AppState>,
    parameters: web::Query<Parameters>,
) -> Result<HttpResponse, ApiError> {
    let query = required_query(parameters.query.as_deref())?;

    let today = calendar::today();
    let start = parameters.start.unwrap_or_else(|| calendar::start_of_year(today));
    let end = parameters.end.unwrap_or(today);

    let resolved = state.resolver.resolve_query(query, start, end).await?;

    let price_history = history::fetch_history(state.market.as_ref(), &resolved).await?;

    let status = if price_history.is_empty() {
        "empty"
    } else {
        "success"
    };

    let moving_averages = price_history.moving_averages(&indicators::DEFAULT_WINDOWS);

    Ok(HttpResponse::Ok().json(json!({
        "status": status,
        "query": query,
        "code": price_history.code,
        "start": price_history.start,
        "end": price_history.end,
        "bars": price_history.bars,
        "moving_averages": moving_averages,
    })))
}
