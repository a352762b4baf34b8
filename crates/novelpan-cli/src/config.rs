//! Layered run configuration: CLI flags over `--set` values over the TOML file over defaults.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
