use actix_web::web;

pub mod analyze;
pub mod system;
pub mod tasks;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(system::index)
        .service(system::health)
        .service(analyze::analyze)
        .service(analyze::analyze_json)
        .service(tasks::get_tasks)
        .service(tasks::cancel_task)
        .service(tasks::get_task_progress);
}
