use actix_web::{get, post, web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::state::AppState;
use crate::types::{CancelTaskRequest, ErrorResponse};

#[get("/tasks")]
pub async fn get_tasks(state: web::Data<Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    let tasks = state.job_manager.get_tasks().await;
    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/cancel")]
pub async fn cancel_task(
    req: web::Json<CancelTaskRequest>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let cancelled = state.job_manager.cancel_task(&req.task_id).await;

    if cancelled {
        info!("Task cancelled: {}", req.task_id);
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Task cancelled"
        })))
    } else {
        Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: "Task not found or already finished".to_string(),
            details: Some(req.task_id.clone()),
        }))
    }
}

#[get("/progress/{task_id}")]
pub async fn get_task_progress(
    task_id: web::Path<String>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    match state.job_manager.get_task(&task_id).await {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: "Task not found".to_string(),
            details: None,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_state, RecordingClient};
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_cancel_and_progress() {
        let state = test_state(RecordingClient::replying());
        let (task_id, cancel) = state.job_manager.create_task("reviews.csv".to_string()).await;

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(get_tasks)
                .service(cancel_task)
                .service(get_task_progress),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/cancel")
            .set_json(serde_json::json!({ "task_id": task_id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert!(cancel.is_cancelled());

        let req = test::TestRequest::get()
            .uri(&format!("/progress/{}", task_id))
            .to_request();
        let task: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(task["status"], "Cancelled");

        let req = test::TestRequest::get().uri("/tasks").to_request();
        let tasks: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tasks.as_array().map(|t| t.len()), Some(1));

        let req = test::TestRequest::get().uri("/progress/unknown").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
