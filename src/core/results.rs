use crate::core::collector::ResponseCollector;
use crate::domain::model::{AddressResult, ServiceResponse};
use crate::service::wire;

/// Turns collected raw responses into results.
///
/// Output order is collection order. Entries that fail re-validation, carry
/// a service error, or do not parse are skipped.
#[derive(Debug, Default)]
pub struct ResultPipeline {
    skipped: usize,
}

impl ResultPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn drain(&mut self, collector: ResponseCollector<ServiceResponse>) -> Vec<AddressResult> {
        self.process(collector.into_entries())
    }

    pub fn process<I>(&mut self, responses: I) -> Vec<AddressResult>
    where
        I: IntoIterator<Item = ServiceResponse>,
    {
        let mut results = Vec::new();

        for response in responses {
            if !response.is_valid() {
                self.skipped += 1;
                continue;
            }

            match wire::parse_response(&response.body) {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {
                    tracing::debug!("Response carries a service error, skipping");
                    self.skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Unparseable response skipped: {}", e);
                    self.skipped += 1;
                }
            }
        }

        results
    }
}
