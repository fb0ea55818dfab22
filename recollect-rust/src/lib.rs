pub mod collections;
pub mod config;
pub mod enrichment;
mod errors;
pub mod fetcher;
mod image_data;
pub mod intake;
mod model_output;
mod seed;
pub mod server;
pub mod similarity;
pub mod storage;
pub mod store;
mod types;
pub mod unlock;

pub use errors::*;
pub use types::*;
