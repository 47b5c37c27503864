//! API route definitions.
//!
//! This module organizes all HTTP routes for the Sqlmacro API server.

mod expand;
mod health;
mod macros;

pub use expand::{expand_routes, ExpandError, ExpandRequest, ExpandResponse};
pub use health::{health_routes, HealthResponse};
pub use macros::{macros_routes, MacroListResponse};
