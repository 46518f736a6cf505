use crate::core::dispatcher::{Dispatched, Dispatcher};
use crate::core::results::ResultPipeline;
use crate::core::{AddressService, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{AddressRequest, AddressResult, BatchResult, BatchSummary, Discard};
use crate::service::UspsClient;
use crate::utils::error::{Result, VerifyError};
use std::path::Path;

pub const SUMMARY_FILE: &str = "summary.json";
pub const DISCARDS_FILE: &str = "discarded.csv";

/// Reads addresses from CSV, verifies them through a [`Dispatcher`] and
/// writes the normalized rows back out as CSV.
pub struct AddressPipeline<S: Storage, C: ConfigProvider, V: AddressService> {
    storage: S,
    config: C,
    dispatcher: Dispatcher<V>,
}

impl<S: Storage, C: ConfigProvider> AddressPipeline<S, C, UspsClient> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = UspsClient::new(
            config.base_url(),
            config.user_id(),
            config.dispatch_config().call_timeout,
        )?;
        Ok(Self::with_service(storage, config, client))
    }
}

impl<S: Storage, C: ConfigProvider, V: AddressService> AddressPipeline<S, C, V> {
    pub fn with_service(storage: S, config: C, service: V) -> Self {
        let dispatcher = Dispatcher::new(service, config.dispatch_config());
        Self {
            storage,
            config,
            dispatcher,
        }
    }

    fn output_path(&self, file: &str) -> String {
        Path::new(self.config.output_dir())
            .join(file)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, V: AddressService> Pipeline for AddressPipeline<S, C, V> {
    async fn extract(&self) -> Result<Vec<AddressRequest>> {
        tracing::debug!("Reading addresses from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        parse_addresses(&data, self.config.has_headers())
    }

    async fn transform(&self, requests: Vec<AddressRequest>) -> Result<BatchResult> {
        let Dispatched {
            responses,
            discards,
            submitted,
            elapsed,
            ..
        } = self.dispatcher.dispatch(&requests).await;

        let collected = responses.len();
        let mut result_pipeline = ResultPipeline::new();
        let results = result_pipeline.drain(responses);

        if result_pipeline.skipped() > 0 {
            tracing::warn!(
                "{} collected responses produced no result",
                result_pipeline.skipped()
            );
        }

        let summary = BatchSummary {
            submitted,
            collected,
            discarded: discards.len(),
            skipped: result_pipeline.skipped(),
            written: results.len(),
            elapsed_ms: elapsed.as_millis(),
        };

        Ok(BatchResult {
            results,
            discards,
            summary,
        })
    }

    async fn load(&self, result: BatchResult) -> Result<String> {
        let output_path = self.output_path(self.config.output_file());

        let data = render_results(&result.results)?;
        tracing::debug!("Writing {} rows to {}", result.results.len(), output_path);
        self.storage.write_file(&output_path, &data).await?;

        if self.config.write_discards() && !result.discards.is_empty() {
            let data = render_discards(&result.discards)?;
            self.storage
                .write_file(&self.output_path(DISCARDS_FILE), &data)
                .await?;
        }

        if self.config.write_summary() {
            let data = serde_json::to_vec_pretty(&result.summary)?;
            self.storage
                .write_file(&self.output_path(SUMMARY_FILE), &data)
                .await?;
        }

        Ok(output_path)
    }
}

/// Input rows in file order. Short rows are padded with empty fields.
pub fn parse_addresses(data: &[u8], has_headers: bool) -> Result<Vec<AddressRequest>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(data);

    let mut requests = Vec::new();
    for record in reader.records() {
        let record = record?;
        requests.push(AddressRequest::from_fields(record.iter()));
    }
    Ok(requests)
}

/// One `address1,address2,city,state,zip5,zip4` line per result, no header.
pub fn render_results(results: &[AddressResult]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for result in results {
        writer.write_record(result.to_record())?;
    }

    writer
        .into_inner()
        .map_err(|e| VerifyError::IoError(e.into_error()))
}

pub fn render_discards(discards: &[Discard]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "row", "reason", "address1", "address2", "city", "state", "zip5", "zip4",
    ])?;

    for discard in discards {
        let mut row = vec![discard.index.to_string(), discard.reason.to_string()];
        row.extend(discard.request.to_record().iter().map(|field| field.to_string()));
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| VerifyError::IoError(e.into_error()))
}
