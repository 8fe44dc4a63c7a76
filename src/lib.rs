#![doc = "The `taskflux` library crate."]
#![doc = ""]
#![doc = "This crate contains the credential and token core, the user directory and task"]
#![doc = "store abstractions with their PostgreSQL and in-memory backends, the HTTP routes,"]
#![doc = "configuration, and error handling for the TaskFlux backend."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod tasks;
pub mod validation;

pub use crate::error::AppError;
pub use crate::state::AppState;
