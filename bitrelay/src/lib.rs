pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exchange;
pub mod handlers;
pub mod models;
pub mod services;
pub mod shutdown;
pub mod tasks;
pub mod telemetry;

pub use crate::errors::{AppError, AppResult};
