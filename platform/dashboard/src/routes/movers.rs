use actix_web::{get, web, HttpResponse};
use serde_json::json;
use stockboard::cache::Cached;
use stockboard::movers::MoversStrategy;

use crate::state::AppState;

#[get("/movers")]
pub async fn handler(state: web::Data<AppState>) -> HttpResponse {
    let strategy = match state.movers.strategy() {
        MoversStrategy::Fixed { .. } => "fixed",
        MoversStrategy::Ranked { .. } => "ranked",
    };

    let (status, movers) = match state.movers.get_movers().await {
        Cached::Fresh(movers) => ("fresh", movers.to_vec()),
        Cached::Stale(movers) => ("stale", movers.to_vec()),
        Cached::Unavailable => ("unavailable", Vec::new()),
    };

    HttpResponse::Ok().json(json!({
        "status": status,
        "strategy": strategy,
        "movers": movers,
    }))
}
