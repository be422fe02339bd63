use crate::{
    auth::AuthenticatedUserId, error::AppError, models::TaskInput, services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

/// Retrieves the authenticated user's tasks.
///
/// Results are always scoped to the caller and ordered newest first.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For storage failures.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(user.0).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The owner is always the authenticated caller. An owner id in the body is ignored.
///
/// ## Request Body:
/// - `title`: The title of the task (required, 1-200 characters).
/// - `description` (optional): A description of the task.
/// - `status` (optional): `pending`, `in-progress` or `completed`. Defaults to `pending`.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` object as JSON.
/// - `400 Bad Request`: If the body is not valid JSON for `TaskInput`.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation fails (e.g. empty title).
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUserId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(user.0, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: Returns the `Task` object as JSON.
/// - `403 Forbidden`: If the task belongs to another user.
/// - `404 Not Found`: If no task has this ID.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUserId,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(task_id.into_inner(), user.0).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates an existing task.
///
/// Replaces title and description. The status is kept when omitted.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task` object as JSON.
/// - `403 Forbidden`: If the task belongs to another user.
/// - `404 Not Found`: If no task has this ID.
/// - `422 Unprocessable Entity`: If input validation fails.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUserId,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update(task_id.into_inner(), user.0, task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `403 Forbidden`: If the task belongs to another user.
/// - `404 Not Found`: If no task has this ID.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUserId,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    tasks.delete(task_id.into_inner(), user.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
