pub mod analysis;
pub mod config;
pub mod instruments;
pub mod palette;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod server;
