use std::sync::Arc;

use actix_web::web;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::services::{IdentityService, TaskService};
use crate::store::{TaskStore, UserStore};

/// Shared, read-only services handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub identity: web::Data<IdentityService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenService>,
}

impl AppState {
    pub fn new(
        auth: &AuthConfig,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::from_config(auth));
        let identity = IdentityService::new(
            users,
            PasswordHasher::from_config(auth),
            tokens.clone(),
        )?;

        Ok(Self {
            identity: web::Data::new(identity),
            tasks: web::Data::new(TaskService::new(tasks)),
            tokens: web::Data::from(tokens),
        })
    }

    /// Builds the state over a single backend that stores both users and tasks.
    pub fn with_store<S>(auth: &AuthConfig, store: Arc<S>) -> Result<Self, AppError>
    where
        S: UserStore + TaskStore + 'static,
    {
        Self::new(auth, store.clone(), store)
    }

    /// Registers the services as app data for `App::configure`.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.identity.clone())
            .app_data(self.tasks.clone())
            .app_data(self.tokens.clone());
    }
}
