//! Web layer for the prayer times service.
//!
//! JSON endpoints for the city directory, the day's schedule (with static
//! fallback) and the application monitor.

mod dto;
mod routes;
mod state;


pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
