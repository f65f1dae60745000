//! Terminal host for the job board: configuration, logging, effect
//! execution and a line-oriented presentation layer.
mod app;
mod config;
mod effects;
mod logging;
mod persistence;
mod ui;

pub use app::run_app;
