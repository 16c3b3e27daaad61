//! HTTP API handlers

pub mod colors;
pub mod health;
pub mod upload;

pub use colors::color_routes;
pub use health::health_routes;
pub use upload::upload_routes;
