pub mod collector;
pub mod dispatcher;
pub mod engine;
pub mod progress;
pub mod results;

pub use crate::domain::model::{AddressRequest, AddressResult, BatchResult};
pub use crate::domain::ports::{AddressService, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
