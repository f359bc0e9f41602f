pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::JobConfig};
pub use self::core::{
    etl::JobEngine,
    pipeline::SignPipeline,
    resolver::{month_day, resolve, MonthDaySlicer, SignResolver},
};
pub use domain::model::{Sign, SignRange, SIGN_RANGES, UNKNOWN_SIGN};
pub use utils::error::{AstroError, Result};
