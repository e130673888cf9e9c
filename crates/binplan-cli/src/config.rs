//! Planning configuration as seen by the CLI: a TOML file, `-S` overrides and
//! command-line flags merged over built-in defaults into the core `PlanConfig`.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_app_config, build_config};
pub use models::AppConfig;
