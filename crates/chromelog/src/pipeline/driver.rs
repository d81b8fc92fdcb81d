//! Driver — wires aggregation, decoding and transformation for one header batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::sink::ConsoleSink;
use crate::conf::{BannerMode, PipelineConfig, StyleCategory};
use crate::format::{ConsoleCall, ConsoleMethod, Transformer};
use crate::parser::metrics::DecodeFailureKind;
use crate::parser::payload::DecoderConfig;
use crate::parser::{aggregate, BlobFailure, LogPayload, LogValue, PayloadDecoder, PipelineMetrics, RawHeader};

/// Banner template: method and URL after a header-styled block
const BANNER_TEMPLATE: &str = "%c%s %s";

/// Result of running one header batch.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub calls: Vec<ConsoleCall>,
    pub failures: Vec<BlobFailure>,
}

/// Runs header batches against an immutable configuration snapshot.
///
/// The driver holds no per-run state, so one instance can serve concurrent
/// batches from several threads.
#[derive(Debug, Clone)]
pub struct PipelineDriver {
    config: Arc<PipelineConfig>,
    decoder: PayloadDecoder,
    metrics: Option<Arc<PipelineMetrics>>,
}

impl PipelineDriver {
    pub fn new(config: PipelineConfig) -> Self {
        let decoder = PayloadDecoder::with_config(DecoderConfig {
            max_blob_size: config.max_blob_size,
        });
        Self {
            config: Arc::new(config),
            decoder,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a batch with the current time as batch time
    pub fn run(&self, headers: &[RawHeader]) -> PipelineOutput {
        self.run_at(headers, Utc::now())
    }

    pub fn run_at(&self, headers: &[RawHeader], batch_time: DateTime<Utc>) -> PipelineOutput {
        let mut calls = Vec::new();
        let failures = match self.process(headers, batch_time, &mut calls) {
            Ok(failures) => failures,
            Err(never) => match never {},
        };
        PipelineOutput { calls, failures }
    }

    /// Run a batch, emitting calls to `sink` as each header group completes.
    ///
    /// A sink error stops this run; decode failures never do.
    pub fn run_into<S: ConsoleSink>(
        &self,
        headers: &[RawHeader],
        sink: &mut S,
    ) -> Result<Vec<BlobFailure>, S::Error> {
        self.process(headers, Utc::now(), sink)
    }

    fn process<S: ConsoleSink>(
        &self,
        headers: &[RawHeader],
        batch_time: DateTime<Utc>,
        sink: &mut S,
    ) -> Result<Vec<BlobFailure>, S::Error> {
        let groups = aggregate(headers);
        debug!(headers = headers.len(), groups = groups.len(), "processing header batch");
        if let Some(metrics) = &self.metrics {
            metrics.record_batch(groups.len());
        }

        let transformer = Transformer::new(&self.config);
        let mut failures = Vec::new();

        for group in groups {
            let payload = match self.decoder.decode(&group.blob) {
                Ok(payload) => payload,
                Err(error) => {
                    warn!(header = %group.name, error = %error, "dropping undecodable payload");
                    if let Some(metrics) = &self.metrics {
                        metrics.record_failure(DecodeFailureKind::from(&error));
                    }
                    failures.push(BlobFailure {
                        header: group.name,
                        error,
                    });
                    continue;
                }
            };

            let calls = transformer.transform(&payload, batch_time);
            debug!(header = %group.name, rows = payload.rows.len(), calls = calls.len(), "payload transformed");
            if let Some(metrics) = &self.metrics {
                metrics.record_decoded();
                metrics.record_rows(payload.rows.len(), calls.len());
            }

            for call in calls {
                sink.emit(call)?;
            }
        }

        Ok(failures)
    }

    /// Format one ad-hoc call the same way a payload row would be.
    ///
    /// `template` becomes the first argument, so a template with live
    /// directives is used as the pattern.
    pub fn single(&self, method: &str, template: &str, args: Vec<LogValue>) -> Option<ConsoleCall> {
        let method = method.parse::<ConsoleMethod>().unwrap_or_else(|err| {
            debug!(error = %err, "ad-hoc call falls back to log");
            ConsoleMethod::Log
        });

        let mut log = Vec::with_capacity(args.len() + 1);
        log.push(Value::String(template.to_string()));
        log.extend(args);

        let row = json!([log, false, method.as_str()]);
        Transformer::new(&self.config).transform_row(&LogPayload::default_columns(), &row, Utc::now())
    }

    /// Request banner for `mode`, `None` when banners are off
    pub fn banner(&self, mode: BannerMode, http_method: &str, url: &str) -> Option<ConsoleCall> {
        let method = mode.method()?;
        let style = self.config.styles().raw(StyleCategory::Header).to_string();
        self.single(
            method.as_str(),
            BANNER_TEMPLATE,
            vec![Value::String(style), Value::String(http_method.to_string()), Value::String(url.to_string())],
        )
    }

    /// Closing call for a banner that opened a group
    pub fn close_banner(&self, mode: BannerMode) -> Option<ConsoleCall> {
        match mode.method() {
            Some(method) if method.opens_group() => Some(ConsoleCall::new(ConsoleMethod::GroupEnd, "", Vec::new())),
            _ => None,
        }
    }
}
