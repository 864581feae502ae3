// File: src/lib.rs
pub mod client;
pub mod config;
pub mod detail;
pub mod list;
pub mod model;
pub mod paths;

#[cfg(feature = "tui")]
pub mod tui;
