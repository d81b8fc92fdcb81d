//! Sink — destinations for console calls.

use std::convert::Infallible;
use std::io::{self, Write};

use crate::format::ConsoleCall;

/// Receives console calls in emission order.
pub trait ConsoleSink {
    type Error;

    fn emit(&mut self, call: ConsoleCall) -> Result<(), Self::Error>;
}

impl ConsoleSink for Vec<ConsoleCall> {
    type Error = Infallible;

    fn emit(&mut self, call: ConsoleCall) -> Result<(), Self::Error> {
        self.push(call);
        Ok(())
    }
}

/// Writes each call's `invocation()` array as one JSON line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ConsoleSink for JsonLinesSink<W> {
    type Error = io::Error;

    fn emit(&mut self, call: ConsoleCall) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.writer, &call.invocation())?;
        self.writer.write_all(b"\n")
    }
}
