use crate::core::progress::format_hms;
use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a [`Pipeline`] end to end: read addresses, verify them, write results.
pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting address verification batch");

        tracing::info!("Reading addresses...");
        let requests = self.pipeline.extract().await?;
        tracing::info!("Read {} addresses", requests.len());

        let result = self.pipeline.transform(requests).await?;
        tracing::info!(
            "Verified {} of {} addresses ({} discarded)",
            result.summary.collected,
            result.summary.submitted,
            result.summary.discarded
        );

        let written = result.results.len();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "{}     {} requests completed in {:.3}s",
            format_hms(started.elapsed()),
            written,
            started.elapsed().as_secs_f64()
        );
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
