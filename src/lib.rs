pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod service;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::LocalStorage;
pub use app::pipelines::AddressPipeline;
pub use crate::core::dispatcher::{DispatchConfig, Dispatcher};
pub use crate::core::engine::BatchEngine;
pub use domain::model::{AddressRequest, AddressResult};
pub use service::UspsClient;
pub use utils::error::{Result, VerifyError};
