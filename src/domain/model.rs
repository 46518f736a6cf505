use serde::{Deserialize, Serialize};
use std::fmt;

/// One input row, ready to be sent to the verification service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRequest {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip5: String,
    pub zip4: String,
}

impl AddressRequest {
    /// Builds a request from positional fields; absent fields become empty strings.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = fields.into_iter().map(str::to_string);
        let mut next = || fields.next().unwrap_or_default();
        Self {
            address1: next(),
            address2: next(),
            city: next(),
            state: next(),
            zip5: next(),
            zip4: next(),
        }
    }

    pub fn to_record(&self) -> [&str; 6] {
        [
            &self.address1,
            &self.address2,
            &self.city,
            &self.state,
            &self.zip5,
            &self.zip4,
        ]
    }
}

/// A normalized address as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddressResult {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip5: String,
    pub zip4: String,
}

impl AddressResult {
    pub fn to_record(&self) -> [&str; 6] {
        [
            &self.address1,
            &self.address2,
            &self.city,
            &self.state,
            &self.zip5,
            &self.zip4,
        ]
    }
}

/// Raw payload captured by an execution unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: String,
}

impl ServiceResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Success status with a body worth parsing.
    pub fn is_valid(&self) -> bool {
        self.is_success() && !self.body.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiscardReason {
    Transport(String),
    Timeout,
    Status(u16),
    EmptyBody,
    Aborted(String),
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::Transport(e) => write!(f, "transport error: {}", e),
            DiscardReason::Timeout => write!(f, "call timed out"),
            DiscardReason::Status(code) => write!(f, "HTTP status {}", code),
            DiscardReason::EmptyBody => write!(f, "empty response body"),
            DiscardReason::Aborted(e) => write!(f, "execution unit aborted: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Collected(ServiceResponse),
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discard {
    /// Position of the row in the input.
    pub index: usize,
    pub request: AddressRequest,
    pub reason: DiscardReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub submitted: usize,
    pub collected: usize,
    pub discarded: usize,
    /// Collected but yielded no result (service error or unparseable body).
    pub skipped: usize,
    pub written: usize,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub results: Vec<AddressResult>,
    pub discards: Vec<Discard>,
    pub summary: BatchSummary,
}
