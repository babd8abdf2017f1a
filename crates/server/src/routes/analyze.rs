use actix_multipart::Multipart;
use actix_web::{http::StatusCode, post, web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use reviewlens_common::ReviewLensError;
use std::sync::Arc;
use tracing::info;

use crate::job_manager::{TaskGuard, TaskProgress};
use crate::render;
use crate::state::AppState;
use crate::types::{AnalysisResponse, ErrorResponse};
use crate::workflow::AnalysisReport;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Header carrying the page-generated id to track an upload under
pub const TASK_ID_HEADER: &str = "X-Task-Id";

/// CSV received through the `file` form field
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(mut payload: Multipart) -> actix_web::Result<Option<Upload>> {
    while let Some(field) = payload.next().await {
        let mut field = field?;
        let content_disposition = field.content_disposition();

        if content_disposition.get_name() != Some("file") {
            continue;
        }
        let filename = content_disposition
            .get_filename()
            .unwrap_or("upload.csv")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if bytes.len() + data.len() > MAX_UPLOAD_BYTES {
                return Err(actix_web::error::ErrorPayloadTooLarge(format!(
                    "Upload exceeds {} MB",
                    MAX_UPLOAD_BYTES / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&data);
        }

        return Ok(Some(Upload { filename, bytes }));
    }

    Ok(None)
}

fn requested_task_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(TASK_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
}

/// Run one upload through the workflow under a tracked task
async fn run_analysis(
    state: &AppState,
    upload: &Upload,
    requested_id: Option<String>,
) -> (String, reviewlens_common::Result<AnalysisReport>) {
    let (task_id, cancel) = state
        .job_manager
        .create_task_with_id(upload.filename.clone(), requested_id)
        .await;
    let guard = TaskGuard::new(state.job_manager.clone(), task_id.clone());
    info!(
        "Analyzing upload {} ({} bytes) as task {}",
        upload.filename,
        upload.bytes.len(),
        task_id
    );

    let progress = TaskProgress::new(state.job_manager.clone(), task_id.clone());
    let result = state.workflow.execute(&upload.bytes, &progress, &cancel).await;

    match &result {
        Ok(_) => state.job_manager.complete_task(&task_id).await,
        Err(e) => state.job_manager.fail_task(&task_id, e.to_string()).await,
    }
    guard.finish();

    (task_id, result)
}

fn status_of(err: &ReviewLensError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Upload a CSV and get the rendered report fragment
#[post("/analyze")]
pub async fn analyze(
    req: HttpRequest,
    payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let Some(upload) = read_upload(payload).await? else {
        return Ok(html(StatusCode::BAD_REQUEST, render::error_fragment("No file uploaded")));
    };

    let (_task_id, result) = run_analysis(&state, &upload, requested_task_id(&req)).await;

    Ok(match result {
        Ok(report) => html(StatusCode::OK, render::report_fragment(&report)),
        Err(e) => html(status_of(&e), render::error_fragment(&e.to_string())),
    })
}

/// Upload a CSV and get the report as JSON
#[post("/api/analyze")]
pub async fn analyze_json(
    req: HttpRequest,
    payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let Some(upload) = read_upload(payload).await? else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file uploaded".to_string(),
            details: None,
        }));
    };

    let (task_id, result) = run_analysis(&state, &upload, requested_task_id(&req)).await;

    Ok(match result {
        Ok(report) => HttpResponse::Ok().json(AnalysisResponse {
            task_id,
            filename: upload.filename,
            report,
        }),
        Err(e) => HttpResponse::build(status_of(&e)).json(ErrorResponse {
            error: e.to_string(),
            details: Some(format!("task {}", task_id)),
        }),
    })
}
