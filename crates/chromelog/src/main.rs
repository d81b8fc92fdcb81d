use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chromelog::parser::PipelineMetrics;
use chromelog::pipeline::{ConsoleSink, JsonLinesSink, PipelineDriver};
use chromelog::runtime::{boot, input};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "chromelog",
    version,
    about = "Decode ChromeLogger response headers into console calls (JSON lines on stdout)"
)]
struct Cli {
    /// Header dump with one `Name: value` per line; `-` or absent reads stdin
    input: Option<PathBuf>,

    /// Request method shown in the banner
    #[arg(requires = "url")]
    http_method: Option<String>,

    /// Request URL shown in the banner
    url: Option<String>,
}

impl Cli {
    fn read_input(&self) -> io::Result<String> {
        match self.input.as_deref() {
            None => read_stdin(),
            Some(path) if path == Path::new("-") => read_stdin(),
            Some(path) => fs::read_to_string(path),
        }
    }

    fn request(&self) -> Option<(&str, &str)> {
        match (&self.http_method, &self.url) {
            (Some(method), Some(url)) => Some((method.as_str(), url.as_str())),
            _ => None,
        }
    }
}

fn read_stdin() -> io::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    boot::init_logging();
    let config = boot::boot()?;

    let headers = input::parse_header_dump(&cli.read_input()?);
    info!("Read {} headers", headers.len());

    let metrics = Arc::new(PipelineMetrics::new());
    let driver = PipelineDriver::new(config).with_metrics(Arc::clone(&metrics));
    let mode = driver.config().display_data_url;

    let stdout = io::stdout();
    let mut sink = JsonLinesSink::new(BufWriter::new(stdout.lock()));

    let request = cli.request();
    if let Some((method, url)) = request {
        if let Some(call) = driver.banner(mode, method, url) {
            sink.emit(call)?;
        }
    }

    let failures = driver.run_into(&headers, &mut sink)?;
    for failure in &failures {
        warn!("Skipped {}: {}", failure.header, failure.error);
    }

    if request.is_some() {
        if let Some(call) = driver.close_banner(mode) {
            sink.emit(call)?;
        }
    }
    sink.into_inner().flush()?;

    info!("Pipeline metrics: {}", serde_json::to_string(&metrics.snapshot())?);
    Ok(())
}
