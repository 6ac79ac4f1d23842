use actix_web::{get, web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::routes::errors::{required_query, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct Parameters {
    query: Option<String>,
}

#[get("/resolve")]
pub async fn handler(
    state: web::Data<AppState>,
    parameters: web::Query<Parameters>,
) -> Result<HttpResponse, ApiError> {
    let query = required_query(parameters.query.as_deref())?;

    let code = state.resolver.resolve(query).await?;

    info!("resolved '{}' to {}", query, code);

    Ok(HttpResponse::Ok().json(json!({
        "query": query,
        "code": code,
    })))
}
