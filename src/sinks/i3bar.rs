//! i3bar JSON protocol.
//!
//! The header and the opening of the infinite array are written before the first
//! status line; each status line is then a `,`-prefixed JSON array.

use crate::model::Element;
use crate::sinks::{Sink, SinkError};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// The protocol header sent once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I3BarHeader {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_signal: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cont_signal: Option<i32>,
    #[serde(default)]
    pub click_events: bool,
}

impl Default for I3BarHeader {
    fn default() -> Self {
        Self {
            version: 1,
            stop_signal: None,
            cont_signal: None,
            click_events: false,
        }
    }
}

pub struct I3Bar<W> {
    header: I3BarHeader,
    out: W,
    wrote_header: bool,
}

impl<W: Write + Send> I3Bar<W> {
    pub fn new(header: I3BarHeader, out: W) -> Self {
        Self {
            header,
            out,
            wrote_header: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, &self.header)?;
        self.out.write_all(b"\n[\n[]\n")?;
        self.wrote_header = true;
        Ok(())
    }
}

impl<W: Write + Send> Sink for I3Bar<W> {
    fn write(&mut self, elements: &[Element]) -> Result<(), SinkError> {
        let line = serde_json::to_vec(elements)?;
        if !self.wrote_header {
            self.write_header()?;
        }
        self.out.write_all(b",")?;
        self.out.write_all(&line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
