//! CPU load, from the one-minute load average relative to the number of cores.

use crate::framework::WidgetError;
use crate::model::{Align, Color, Element};
use crate::probes::{hbar, Probe, ProbeResult};
use std::path::PathBuf;

const METER_SIZE: usize = 5;
const COLOR: Color = Color::rgb(0x8A, 0x8B, 0x8C);

#[derive(Debug, Clone)]
pub struct CpuProbe {
    pub loadavg: PathBuf,
    /// Range list of present cores, e.g. `0-3,8-11`.
    pub present: PathBuf,
    pub alignment: Option<Align>,
}

impl Default for CpuProbe {
    fn default() -> Self {
        Self {
            loadavg: PathBuf::from("/proc/loadavg"),
            present: PathBuf::from("/sys/devices/system/cpu/present"),
            alignment: None,
        }
    }
}

/// Parses the first field of `/proc/loadavg`.
pub fn parse_loadavg(data: &str) -> Result<f64, WidgetError> {
    data.split_whitespace()
        .next()
        .ok_or_else(|| WidgetError::Probe("empty load average".into()))?
        .parse()
        .map_err(|e| WidgetError::Probe(format!("invalid load average: {e}")))
}

/// Counts the cores in a range list such as `0-3,8-11` or `0`.
pub fn parse_core_ranges(data: &str) -> Result<u32, WidgetError> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| WidgetError::Probe(format!("invalid core range {data:?}: {e}")))
    };
    let mut cores = 0;
    for range in data.trim().split(',') {
        match range.split_once('-') {
            Some((left, right)) => {
                let (left, right) = (parse(left)?, parse(right)?);
                if right < left {
                    return Err(WidgetError::Probe(format!("invalid core range {range:?}")));
                }
                cores += right - left + 1;
            }
            None => {
                parse(range)?;
                cores += 1;
            }
        }
    }
    Ok(cores)
}

impl Probe for CpuProbe {
    fn probe(&self) -> ProbeResult {
        let load = parse_loadavg(&std::fs::read_to_string(&self.loadavg)?)?;
        let cores = parse_core_ranges(&std::fs::read_to_string(&self.present)?)?;
        let usage = load / f64::from(cores);

        let meter = hbar((usage * METER_SIZE as f64) as usize, METER_SIZE, '+', '-');
        let mut element = Element::new("CPU", format!("{}% {meter}", (usage * 100.0) as i64))
            .with_color(COLOR);
        element.alignment = self.alignment;
        Ok(vec![element])
    }
}
