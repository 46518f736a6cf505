use crate::core::dispatcher::DispatchConfig;
use crate::domain::model::{AddressRequest, BatchResult, ServiceResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(&self, path: &str, data: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn user_id(&self) -> &str;
    fn input_path(&self) -> &str;
    fn has_headers(&self) -> bool;
    fn output_dir(&self) -> &str;
    fn output_file(&self) -> &str;
    fn write_summary(&self) -> bool;
    fn write_discards(&self) -> bool;
    fn dispatch_config(&self) -> DispatchConfig;
}

/// One network round-trip to the address verification service.
///
/// Implementations return `Err` only for transport-level failures; any
/// HTTP response, including error statuses, comes back as `Ok`.
pub trait AddressService: Send + Sync + 'static {
    fn verify(
        &self,
        request: &AddressRequest,
    ) -> impl Future<Output = Result<ServiceResponse>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<AddressRequest>>;
    async fn transform(&self, requests: Vec<AddressRequest>) -> Result<BatchResult>;
    async fn load(&self, result: BatchResult) -> Result<String>;
}
