//! Periodic external commands.

use crate::framework::WidgetError;
use crate::model::{Align, Element};
use crate::probes::{Probe, ProbeResult};
use serde::{Deserialize, Serialize};
use std::process::Command;

/// How a command's stdout becomes elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// The whole output is the text of one element.
    #[default]
    Text,
    /// The output is one JSON element.
    Json,
    /// The output is a JSON array of elements.
    JsonArray,
}

/// Runs a command and turns its output into elements.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    pub program: String,
    pub args: Vec<String>,
    pub instance: String,
    pub mode: OutputMode,
    /// Trim surrounding whitespace in [`OutputMode::Text`].
    pub trim: bool,
    pub alignment: Option<Align>,
}

impl CommandProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            instance: String::new(),
            mode: OutputMode::Text,
            trim: true,
            alignment: Some(Align::Right),
        }
    }

    fn parse(&self, stdout: &[u8]) -> ProbeResult {
        let mut elements = match self.mode {
            OutputMode::Text => {
                let text = String::from_utf8_lossy(stdout);
                let text = if self.trim { text.trim() } else { &*text };
                let mut element = Element::new("Command", text);
                element.alignment = self.alignment;
                vec![element]
            }
            OutputMode::Json => vec![serde_json::from_slice::<Element>(stdout)?],
            OutputMode::JsonArray => serde_json::from_slice::<Vec<Element>>(stdout)?,
        };
        for e in &mut elements {
            if e.instance.is_empty() {
                e.instance.clone_from(&self.instance);
            }
        }
        Ok(elements)
    }
}

impl Probe for CommandProbe {
    fn probe(&self) -> ProbeResult {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| WidgetError::Command(format!("{}: {e}", self.program)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WidgetError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        self.parse(&output.stdout)
    }
}
