// Module structure for the chromelog pipeline.

// Core pipeline
pub mod parser;
pub mod format;
pub mod pipeline;

// Process support
pub mod conf;
pub mod runtime;

pub use conf::PipelineConfig;
pub use format::ConsoleCall;
pub use parser::RawHeader;
pub use pipeline::{PipelineDriver, PipelineOutput};
