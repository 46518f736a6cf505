pub mod address_pipeline;

pub use address_pipeline::AddressPipeline;
