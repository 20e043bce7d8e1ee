//! HTTP surface of the task API.
//!
//! Cancellation is handled as a cooperative signal, not a fault: every store
//! interaction races against the shutdown token, and a cancelled operation
//! logs the fact and answers with its in-scope default (empty list,
//! not-found, an echoed id) instead of an error status. Everything else
//! either maps to an explicit 404/400 or propagates as [`ApiError`].

use std::future::Future;
use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse, Responder, ResponseError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use todolist_shared::{CreateTaskRequest, TaskInfo, UpdateTaskRequest};

use crate::mapping;
use crate::store::{StoreError, TaskStore};

/// Dependencies shared by every handler.
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    /// Cancelled once the server stops accepting traffic; in-flight
    /// operations observe it and bail out with their default result.
    pub shutdown: CancellationToken,
}

/// Faults that escape a handler uncaught. Rendered as a plain 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid datetime value: {0}")]
    InvalidDateTime(#[from] chrono::ParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {}

/// Races an operation against the shutdown signal. `None` means the signal
/// won; the caller falls back to its default result. The signal is checked
/// first, so an operation never starts once cancellation is observed.
async fn run_unless_cancelled<F: Future>(token: &CancellationToken, op: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        output = op => Some(output),
    }
}

/// Registers every route of the task API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_tasks)
        .service(get_task_by_id)
        .service(post_task)
        .service(put_task_by_id)
        .service(delete_task_by_id)
        .service(health);
}

#[get("/tasks")]
async fn get_tasks(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    log::info!("GET tasks called");

    let mut tasks = Vec::new();
    match run_unless_cancelled(&state.shutdown, state.store.list_all()).await {
        Some(found) => {
            tasks = found?;
            log::info!("GET tasks completed successfully");
        }
        None => log::info!("GET tasks was cancelled"),
    }

    let infos: Vec<TaskInfo> = tasks.iter().map(mapping::task_info).collect();
    Ok(HttpResponse::Ok().json(infos))
}

#[get("/tasks/{id}")]
async fn get_task_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    log::info!("GET task {id} called");

    let mut task = None;
    match run_unless_cancelled(&state.shutdown, state.store.find_by_id(id)).await {
        Some(found) => task = found?,
        None => log::info!("GET task {id} was cancelled"),
    }

    let Some(task) = task else {
        log::info!("GET task {id} failed: not found");
        return Ok(HttpResponse::NotFound().finish());
    };

    log::info!("GET task {id} completed successfully");
    Ok(HttpResponse::Ok().json(mapping::task_info(&task)))
}

#[post("/tasks")]
async fn post_task(
    state: web::Data<AppState>,
    body: web::Json<Option<CreateTaskRequest>>,
) -> Result<HttpResponse, ApiError> {
    log::info!("POST task called");

    let Some(body) = body.into_inner() else {
        log::info!("POST task failed: bad request");
        return Ok(HttpResponse::BadRequest().finish());
    };

    let task = mapping::new_task_record(&body)?;

    let mut id = 0;
    match run_unless_cancelled(&state.shutdown, state.store.insert(&task)).await {
        Some(inserted) => {
            id = inserted?;
            log::info!("POST task completed successfully, assigned id {id}");
        }
        None => log::info!("POST task was cancelled"),
    }

    Ok(HttpResponse::Ok().json(id))
}

#[put("/tasks/{id}")]
async fn put_task_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Option<UpdateTaskRequest>>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    log::info!("PUT task {id} called");

    let Some(body) = body.into_inner() else {
        log::info!("PUT task {id} failed: bad request");
        return Ok(HttpResponse::BadRequest().finish());
    };

    match run_unless_cancelled(&state.shutdown, merge_and_save(state.store.as_ref(), id, &body)).await
    {
        Some(outcome) => {
            if !outcome? {
                log::info!("PUT task {id} failed: not found");
                return Ok(HttpResponse::NotFound().finish());
            }
            log::info!("PUT task {id} completed successfully");
        }
        None => log::info!("PUT task {id} was cancelled"),
    }

    Ok(HttpResponse::Ok().json(id))
}

/// Field-by-field merge of an update into the stored record. Returns whether
/// the record existed.
async fn merge_and_save(
    store: &dyn TaskStore,
    id: i64,
    body: &UpdateTaskRequest,
) -> Result<bool, ApiError> {
    let Some(mut task) = store.find_by_id(id).await? else {
        return Ok(false);
    };

    mapping::apply_update(&mut task, body)?;
    store.update(&task).await?;
    Ok(true)
}

#[delete("/tasks/{id}")]
async fn delete_task_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    log::info!("DELETE task {id} called");

    match run_unless_cancelled(&state.shutdown, state.store.remove(id)).await {
        Some(removed) => {
            if !removed? {
                log::info!("DELETE task {id} failed: not found");
                return Ok(HttpResponse::NotFound().finish());
            }
            log::info!("DELETE task {id} completed successfully");
        }
        None => log::info!("DELETE task {id} was cancelled"),
    }

    Ok(HttpResponse::NoContent().finish())
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().finish()
}
