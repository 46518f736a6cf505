use crate::domain::model::{AddressRequest, ServiceResponse};
use crate::domain::ports::AddressService;
use crate::service::wire;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str =
    "https://secure.shippingapis.com/ShippingAPI.dll?API=Verify&XML=";

/// reqwest-backed client for the USPS `Verify` endpoint.
#[derive(Debug, Clone)]
pub struct UspsClient {
    client: Client,
    base_url: String,
    user_id: String,
}

impl UspsClient {
    /// `base_url` must end where the encoded XML goes, e.g. `...&XML=`.
    pub fn new(base_url: &str, user_id: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.to_string(),
            user_id: user_id.to_string(),
        })
    }

    pub fn request_url(&self, request: &AddressRequest) -> Result<String> {
        let encoded = wire::encode_request(&self.user_id, request)?;
        Ok(format!("{}{}", self.base_url, encoded))
    }
}

impl AddressService for UspsClient {
    async fn verify(&self, request: &AddressRequest) -> Result<ServiceResponse> {
        let url = self.request_url(request)?;

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        tracing::debug!("Verify response status: {}", status);

        let body = response.text().await?;
        Ok(ServiceResponse { status, body })
    }
}
