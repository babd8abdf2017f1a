use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::render;
use crate::state::AppState;
use crate::types::HealthResponse;

/// Upload page
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render::index_page())
}

#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: state.config.llm_model.clone(),
    })
}
