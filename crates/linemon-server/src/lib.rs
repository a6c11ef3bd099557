pub mod api;
pub mod app;
pub mod config;
pub mod cycle;
pub mod logging;
pub mod state;
