//! HTTP server
//!
//! Lifecycle, maintenance, event ingress, report preview and health
//! endpoints over actix-web.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;

pub use builder::ServerBuilder;
pub use server::HttpServer;
pub use state::AppState;
