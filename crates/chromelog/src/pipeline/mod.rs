/// Pipeline driver module
///
/// Runs one batch of response headers through aggregation, decoding and
/// transformation, and hands the resulting console calls to a sink.
///
/// - `driver.rs`: Batch orchestration, banners and ad-hoc calls
/// - `sink.rs`: Console call destinations

pub mod driver;
pub mod sink;

pub use driver::{PipelineDriver, PipelineOutput};
pub use sink::{ConsoleSink, JsonLinesSink};
