//! # yelpcamp HTTP Server Module
//!
//! JSON API over the campground and review repositories.
//!
//! # Endpoints
//!
//! - `/` and `/health` - Landing and health check
//! - `/campgrounds[/:id]` - Campground CRUD
//! - `/campgrounds/:id/reviews[/:review_id]` - Review create and delete
//! - `/admin/consistency` - Referential-integrity report
//!
//! Every failure leaves the server as an
//! [`ErrorEnvelope`](crate::errors::ErrorEnvelope).

pub mod adapter;
pub mod campground_routes;
pub mod config;
pub mod observability_routes;
pub mod response;
pub mod review_routes;
pub mod server;
pub mod state;

pub use adapter::catch_async;
pub use config::HttpServerConfig;
pub use server::{build_router, HttpServer};
pub use state::AppState;
