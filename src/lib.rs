pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use config::ConvertConfig;
pub use error::{ConvertError, Result};
pub use pipeline::{Conversion, Pipeline, PipelineResult};
