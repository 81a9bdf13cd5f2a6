pub mod config;
mod http_layers;
pub mod metrics;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;
mod upload_routes;

pub use config::ServerConfig;
pub use http_layers::*;
pub use upload_routes::upload_routes;
#[allow(unused_imports)] // Used by main.rs
pub use server::{make_app, run_server};
