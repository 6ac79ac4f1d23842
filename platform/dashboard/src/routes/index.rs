use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::state::AppState;

#[get("/")]
pub async fn handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "title": state.title }))
}
