pub mod identity;
pub mod tasks;

pub use identity::IdentityService;
pub use tasks::TaskService;

use crate::error::AppError;

/// Runs CPU-heavy work such as bcrypt on tokio's blocking pool.
pub(crate) async fn run_blocking<F, T>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Blocking task failed: {}", e)))
}
