//! Remote address verification service: wire format and HTTP client.

pub mod usps;
pub mod wire;

pub use usps::{UspsClient, DEFAULT_BASE_URL};
