#![doc = "The `pro_todo` library crate."]
#![doc = ""]
#![doc = "A personal todo-list API: password hashing, signed session tokens, the request"]
#![doc = "authentication gate, ownership-checked task operations and their storage backends."]
#![doc = "The `main` binary wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
