//! Web layer for the charging server.
//!
//! Provides JSON endpoints for browsing stations and planning routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Browser};
