//! # Configuration
//!
//! The bar is described by a JSON file: the output format and the widget list. The
//! order of `widgets` is the order on the bar.
//!
//! ```json
//! {
//!   "output": { "format": "i3bar" },
//!   "widgets": [
//!     { "kind": "stream", "program": "nm_watcher", "args": ["wlp3s0"], "instance": "wifi" },
//!     { "kind": "command", "program": "spotifystatus", "args": ["--json"], "mode": "json", "every_secs": 10 },
//!     { "kind": "watch", "paths": ["/sys/class/backlight/intel_backlight"],
//!       "probe": { "kind": "command", "program": "light", "args": ["-G"] } },
//!     { "kind": "battery", "align": "right" },
//!     { "kind": "clock", "format": "%a %b %e %H:%M:%S", "align": "right" }
//!   ]
//! }
//! ```
//!
//! A failing widget is never retried: it shows an error in its slot until the bar
//! restarts.

use crate::framework::Generator;
use crate::generators::{IntervalGenerator, StreamingGenerator, WatchGenerator};
use crate::model::Align;
use crate::probes::{BatteryProbe, ClockProbe, CommandProbe, CpuProbe, OutputMode, Probe};
use crate::sinks::{Dzen2, I3Bar, I3BarHeader, Lemonbar, Sink};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("widget #{index}: {reason}")]
    Widget { index: usize, reason: String },
}

/// Bar wire formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    I3bar,
    Lemonbar,
    Dzen2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// One widget, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetConfig {
    Clock {
        #[serde(default = "default_clock_format")]
        format: String,
        #[serde(default = "default_fast")]
        every_secs: u64,
        #[serde(default)]
        align: Option<Align>,
    },
    Cpu {
        #[serde(default = "default_slow")]
        every_secs: u64,
        #[serde(default)]
        align: Option<Align>,
    },
    Battery {
        #[serde(default = "default_slow")]
        every_secs: u64,
        #[serde(default)]
        align: Option<Align>,
    },
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default = "default_slow")]
        every_secs: u64,
        #[serde(default)]
        instance: String,
        #[serde(default)]
        mode: OutputMode,
        #[serde(default = "default_true")]
        trim: bool,
        #[serde(default = "default_right")]
        align: Option<Align>,
    },
    Stream {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        instance: String,
    },
    /// Re-runs `probe` (any polling kind) whenever one of `paths` changes.
    Watch {
        paths: Vec<PathBuf>,
        probe: Box<WidgetConfig>,
    },
}

fn default_clock_format() -> String {
    "%a %b %e %H:%M:%S".to_string()
}

fn default_fast() -> u64 {
    1
}

fn default_slow() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_right() -> Option<Align> {
    Some(Align::Right)
}

impl WidgetConfig {
    /// Name used for the widget in logs.
    pub fn name(&self) -> String {
        match self {
            WidgetConfig::Clock { .. } => "clock".to_string(),
            WidgetConfig::Cpu { .. } => "cpu".to_string(),
            WidgetConfig::Battery { .. } => "battery".to_string(),
            WidgetConfig::Command { program, .. } => format!("command:{program}"),
            WidgetConfig::Stream { program, .. } => format!("stream:{program}"),
            WidgetConfig::Watch { probe, .. } => format!("watch:{}", probe.name()),
        }
    }

    /// The probe behind a polling widget; `None` for kinds that are not probes.
    pub fn probe(&self) -> Option<Arc<dyn Probe>> {
        let probe: Arc<dyn Probe> = match self {
            WidgetConfig::Clock { format, align, .. } => Arc::new(ClockProbe {
                format: format.clone(),
                alignment: *align,
            }),
            WidgetConfig::Cpu { align, .. } => Arc::new(CpuProbe {
                alignment: *align,
                ..Default::default()
            }),
            WidgetConfig::Battery { align, .. } => Arc::new(BatteryProbe {
                alignment: *align,
                ..Default::default()
            }),
            WidgetConfig::Command {
                program,
                args,
                instance,
                mode,
                trim,
                align,
                ..
            } => Arc::new(CommandProbe {
                program: program.clone(),
                args: args.clone(),
                instance: instance.clone(),
                mode: *mode,
                trim: *trim,
                alignment: *align,
            }),
            WidgetConfig::Stream { .. } | WidgetConfig::Watch { .. } => return None,
        };
        Some(probe)
    }

    fn every(&self) -> Option<u64> {
        match self {
            WidgetConfig::Clock { every_secs, .. }
            | WidgetConfig::Cpu { every_secs, .. }
            | WidgetConfig::Battery { every_secs, .. }
            | WidgetConfig::Command { every_secs, .. } => Some(*every_secs),
            WidgetConfig::Stream { .. } | WidgetConfig::Watch { .. } => None,
        }
    }

    pub fn build(&self, index: usize) -> Result<Box<dyn Generator>, ConfigError> {
        let invalid = |reason: &str| ConfigError::Widget {
            index,
            reason: reason.to_string(),
        };
        let name = self.name();
        match self {
            WidgetConfig::Stream {
                program,
                args,
                instance,
            } => Ok(Box::new(
                StreamingGenerator::new(name, program.clone(), args.clone())
                    .with_instance(instance.clone()),
            )),
            WidgetConfig::Watch { paths, probe } => {
                if paths.is_empty() {
                    return Err(invalid("watch needs at least one path"));
                }
                let probe = probe
                    .probe()
                    .ok_or_else(|| invalid("watch probe must be a polling kind"))?;
                Ok(Box::new(WatchGenerator::new(name, paths.clone(), probe)))
            }
            _ => {
                let every = self.every().unwrap_or_default();
                if every == 0 {
                    return Err(invalid("every_secs must be positive"));
                }
                let probe = self
                    .probe()
                    .ok_or_else(|| invalid("not a polling kind"))?;
                Ok(Box::new(IntervalGenerator::new(
                    name,
                    probe,
                    Duration::from_secs(every),
                )))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            widgets: vec![
                WidgetConfig::Cpu {
                    every_secs: default_slow(),
                    align: Some(Align::Right),
                },
                WidgetConfig::Battery {
                    every_secs: default_slow(),
                    align: Some(Align::Right),
                },
                WidgetConfig::Clock {
                    format: default_clock_format(),
                    every_secs: default_fast(),
                    align: Some(Align::Right),
                },
            ],
        }
    }
}

impl BarConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// One generator per widget, in bar order.
    pub fn build(&self) -> Result<Vec<Box<dyn Generator>>, ConfigError> {
        self.widgets
            .iter()
            .enumerate()
            .map(|(index, widget)| widget.build(index))
            .collect()
    }

    /// The configured renderer, writing to `out`.
    pub fn sink<W: Write + Send + 'static>(&self, out: W) -> Box<dyn Sink> {
        match self.output.format {
            OutputFormat::I3bar => Box::new(I3Bar::new(i3bar_header(), out)),
            OutputFormat::Lemonbar => Box::new(Lemonbar::new(out)),
            OutputFormat::Dzen2 => Box::new(Dzen2::new(out)),
        }
    }
}

/// Advertises the suspend/resume signals so i3bar pauses the bar through them.
#[cfg(unix)]
fn i3bar_header() -> I3BarHeader {
    use crate::lifecycle::{resume_signal_number, suspend_signal_number};
    I3BarHeader {
        stop_signal: Some(suspend_signal_number()),
        cont_signal: Some(resume_signal_number()),
        ..Default::default()
    }
}

#[cfg(not(unix))]
fn i3bar_header() -> I3BarHeader {
    I3BarHeader::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_widget_kind() {
        let config = BarConfig::from_json(
            r#"{
                "output": { "format": "lemonbar" },
                "widgets": [
                    { "kind": "stream", "program": "nm_watcher", "args": ["wlp3s0"] },
                    { "kind": "command", "program": "mullvad_jsonblock", "mode": "json" },
                    { "kind": "watch", "paths": ["/tmp"], "probe": { "kind": "cpu" } },
                    { "kind": "battery" },
                    { "kind": "clock", "format": "%H:%M", "align": "right" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.output.format, OutputFormat::Lemonbar);
        let names: Vec<_> = config.widgets.iter().map(WidgetConfig::name).collect();
        assert_eq!(
            names,
            vec!["stream:nm_watcher", "command:mullvad_jsonblock", "watch:cpu", "battery", "clock"]
        );
        assert!(matches!(
            &config.widgets[1],
            WidgetConfig::Command { every_secs: 10, mode: OutputMode::Json, trim: true, .. }
        ));

        let generators = config.build().unwrap();
        let built: Vec<_> = generators.iter().map(|g| g.name().to_string()).collect();
        assert_eq!(built, names);
    }

    #[test]
    fn rejects_invalid_widgets() {
        let zero = BarConfig::from_json(r#"{ "widgets": [ { "kind": "clock", "every_secs": 0 } ] }"#)
            .unwrap();
        assert!(matches!(zero.build(), Err(ConfigError::Widget { index: 0, .. })));

        let nested = BarConfig::from_json(
            r#"{ "widgets": [ { "kind": "cpu" }, { "kind": "watch", "paths": ["/tmp"], "probe": { "kind": "stream", "program": "x" } } ] }"#,
        )
        .unwrap();
        assert!(matches!(nested.build(), Err(ConfigError::Widget { index: 1, .. })));

        assert!(matches!(
            BarConfig::from_json(r#"{ "widgets": [ { "kind": "radio" } ] }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn default_config_builds() {
        let config = BarConfig::default();
        assert_eq!(config.output.format, OutputFormat::I3bar);
        assert_eq!(config.build().unwrap().len(), 3);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = BarConfig::load(Path::new("/nonexistent/bar.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
